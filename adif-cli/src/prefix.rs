//! WPX-style callsign prefix extraction

/// Portable/mobile designators that do not change the prefix
const IGNORED_SUFFIXES: &[&str] = &["P", "M", "MM", "AM", "QRP", "A", "R"];

/// Prefix of a callsign, e.g. `K1ABC` -> `K1`, `9A1AA` -> `9A1`
///
/// Portable forms are handled the WPX way: `DL/K1ABC` -> `DL0`,
/// `K1ABC/4` -> `K4`, `K1ABC/P` -> `K1`. Returns `None` for an empty call.
pub fn callsign_prefix(call: &str) -> Option<String> {
    let call = call.trim().to_ascii_uppercase();
    if call.is_empty() {
        return None;
    }

    let parts: Vec<&str> = call
        .split('/')
        .filter(|p| !p.is_empty() && !IGNORED_SUFFIXES.contains(p))
        .collect();

    match parts.as_slice() {
        [] => None,
        [base] => Some(base_prefix(base)),
        [base, area] if area.len() == 1 && area.chars().all(|c| c.is_ascii_digit()) => {
            let prefix = base_prefix(base);
            let letters = prefix.trim_end_matches(|c: char| c.is_ascii_digit());
            Some(format!("{}{}", letters, area))
        }
        [first, second, ..] => {
            // The shorter part is the operating location
            let location = if first.len() <= second.len() { first } else { second };
            let prefix = base_prefix(location);
            if prefix.chars().any(|c| c.is_ascii_digit()) && prefix.len() > 1 {
                Some(prefix)
            } else {
                Some(format!("{}0", location))
            }
        }
    }
}

/// Letters and digits up to the end of the first digit run after the first character
fn base_prefix(call: &str) -> String {
    let chars: Vec<char> = call.chars().collect();
    for idx in 2..chars.len() {
        if chars[idx].is_ascii_alphabetic() && chars[idx - 1].is_ascii_digit() {
            return chars[..idx].iter().collect();
        }
    }
    // No letter after a digit (e.g. "RAEM" or "K1"): the whole call
    call.to_string()
}
