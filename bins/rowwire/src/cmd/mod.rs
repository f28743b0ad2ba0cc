pub mod decode;
pub mod encode;
pub mod rows;

use crate::error::CliError;

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Hex digits to bytes. Whitespace between digits is ignored.
pub(crate) fn from_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(&digits).map_err(|e| CliError::Input(format!("bad hex input: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_ignores_spaces() {
        assert_eq!(to_hex(&[0x08, 0x0a, 0xff]), "080aff");
        assert_eq!(from_hex("08 0a\nff").unwrap(), vec![0x08, 0x0a, 0xff]);
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }
}
