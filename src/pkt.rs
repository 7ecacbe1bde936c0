use std::collections::HashMap;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum PktError {
    #[error("bad opcode {value:?} on line {line}")]
    BadOpcode { line: usize, value: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Opcode-name table, loaded from a line-oriented text file. Each line
/// carries the packet name in the first column and the opcode in the
/// last one (decimal or 0x-prefixed hex); columns in between are ignored.
#[derive(Debug, Clone, Default)]
pub struct PktTable {
    names: HashMap<u32, String>,
}

impl PktTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, PktError> {
        let mut names = HashMap::new();
        for (n, line) in text.lines().enumerate() {
            let mut toks = line.split_whitespace();
            let Some(name) = toks.next() else { continue };
            let value = toks.last().unwrap_or(name);
            let opcode = parse_int(value).ok_or_else(|| PktError::BadOpcode {
                line: n + 1,
                value: value.to_string(),
            })?;
            names.insert(opcode, name.to_string());
        }
        Ok(Self { names })
    }

    pub fn load(path: &Path) -> Result<Self, PktError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Known name or the `PKT_0x..` fallback.
    pub fn name(&self, opcode: u8) -> String {
        match self.names.get(&(opcode as u32)) {
            Some(n) => n.clone(),
            None => format!("PKT_0x{opcode:x}"),
        }
    }

    /// One-shot classifier for a 32-bit packet word: type-3 packets
    /// (top two bits set) print as `PKT3(name, count)` with the opcode
    /// in bits 8-15 and the operand count in bits 16-29; anything else
    /// prints as bare hex.
    pub fn classify(&self, dword: u32) -> String {
        if (dword >> 30) & 0x3 == 3 {
            let opcode = ((dword >> 8) & 0xff) as u8;
            let count = (dword >> 16) & 0x3fff;
            format!("PKT3({}, {})", self.name(opcode), count)
        } else {
            format!("{dword:x}")
        }
    }
}

fn parse_int(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_takes_first_and_last_columns() {
        let t = PktTable::parse("PKT3_NOP it_is_opcode 0x10\nPKT3_SET_BASE 17\n\n").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.name(0x10), "PKT3_NOP");
        assert_eq!(t.name(17), "PKT3_SET_BASE");
    }

    #[test]
    fn unknown_opcodes_get_the_fallback_name() {
        let t = PktTable::new();
        assert_eq!(t.name(0x2a), "PKT_0x2a");
    }

    #[test]
    fn classify_type3_packets() {
        let t = PktTable::parse("PKT3_NOP 0x10\n").unwrap();
        let dword = (3u32 << 30) | (5 << 16) | (0x10 << 8);
        assert_eq!(t.classify(dword), "PKT3(PKT3_NOP, 5)");
        let unknown = (3u32 << 30) | (2 << 16) | (0x2a << 8);
        assert_eq!(t.classify(unknown), "PKT3(PKT_0x2a, 2)");
    }

    #[test]
    fn classify_other_types_as_bare_hex() {
        let t = PktTable::new();
        assert_eq!(t.classify(0x12345678), "12345678");
        assert_eq!(t.classify(0), "0");
    }

    #[test]
    fn count_field_is_fourteen_bits() {
        let t = PktTable::new();
        let dword = (3u32 << 30) | (0x3fff << 16) | (1 << 8);
        assert_eq!(t.classify(dword), "PKT3(PKT_0x1, 16383)");
    }

    #[test]
    fn bad_opcode_is_reported_with_its_line() {
        match PktTable::parse("PKT3_NOP 0x10\nPKT3_BAD nope\n") {
            Err(PktError::BadOpcode { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "nope");
            }
            other => panic!("expected BadOpcode, got {other:?}"),
        }
    }
}
