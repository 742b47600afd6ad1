//! ADIF stream codec
//!
//! The reader turns a byte stream into records; the writer serializes records
//! back to the wire format. Both deal only in raw wire values: formatting is
//! applied by the record accessors, never by the codec.

pub mod reader;
pub mod writer;

// Re-export codec types
pub use reader::AdifReader;
pub use writer::{write_record, AdifWriter};
