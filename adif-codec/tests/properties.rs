use proptest::prelude::*;

use adif_codec::{AdifReader, AdifWriter, FormatterRegistry, Record, RecordKind};

fn field_strategy() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        ("[a-z][a-z0-9_]{0,11}", "[ -~\n]{0,32}"),
        (Just("dxcc".to_string()), "[0-9]{1,3}"),
        (Just("cont".to_string()), prop_oneof![Just("EU".to_string()), Just("oc".to_string()), "[A-Z]{2}"]),
    ]
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (any::<bool>(), prop::collection::vec(field_strategy(), 0..8)).prop_map(|(header, fields)| {
        let kind = if header { RecordKind::Header } else { RecordKind::Qso };
        let mut record = Record::new(kind);
        for (name, value) in fields {
            record.set_raw(&name, value).unwrap();
        }
        record
    })
}

fn read_all(bytes: &[u8]) -> Vec<Record> {
    AdifReader::new(bytes)
        .records()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

proptest! {
    #[test]
    fn written_records_read_back_unchanged(records in prop::collection::vec(record_strategy(), 0..6)) {
        let mut writer = AdifWriter::new(Vec::new());
        writer.write_all(&records).unwrap();
        let bytes = writer.into_inner();

        prop_assert_eq!(read_all(&bytes), records);
    }

    #[test]
    fn field_access_ignores_name_case(
        name in "[a-zA-Z][a-zA-Z0-9_]{0,11}",
        value in "[ -~]{0,24}",
        dxcc in "[0-9]{1,3}",
    ) {
        prop_assume!(!name.eq_ignore_ascii_case("dxcc"));

        let registry = FormatterRegistry::builtin().unwrap();
        let mut record = Record::qso();
        record.set_raw(&name, value.clone()).unwrap();
        record.set_raw("DxCc", dxcc).unwrap();

        let upper = name.to_ascii_uppercase();
        let lower = name.to_ascii_lowercase();
        prop_assert_eq!(record.raw(&upper), Some(value.as_str()));
        prop_assert_eq!(
            record.get_field(&registry, &upper, "?"),
            record.get_field(&registry, &lower, "?")
        );
        prop_assert_eq!(
            record.get_field(&registry, "DXCC", "?"),
            record.get_field(&registry, "dxcc", "?")
        );
        prop_assert_eq!(
            record.get_field(&registry, "DXCC.RAW", "?"),
            record.get_field(&registry, "dxcc.raw", "?")
        );
    }

    #[test]
    fn values_are_consumed_by_declared_length(value in "[<>:a-zA-Z0-9 ]{0,40}") {
        let wire = format!("<COMMENT:{}>{}<EOR><CALL:4>W1AW<EOR>", value.len(), value);
        let mut reader = AdifReader::new(wire.as_bytes());

        let first = reader.read_next().unwrap().unwrap();
        prop_assert_eq!(first.raw("comment"), Some(value.as_str()));
        prop_assert_eq!(first.len(), 1);

        let second = reader.read_next().unwrap().unwrap();
        prop_assert_eq!(second.raw("call"), Some("W1AW"));
        prop_assert!(reader.read_next().unwrap().is_none());
    }
}
