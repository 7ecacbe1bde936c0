use serde::Serialize;

/// Fixed bit-slices of one 32-bit instruction word.
///
/// Every 32-bit value yields a field set; whether the fields mean
/// anything is decided later by the dispatch in `isa::f32cp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fields {
    pub rs: u8,
    pub rd: u8,
    pub rx: u8,
    /// Raw 16-bit immediate (low half of the word).
    pub imm: u16,
    /// Top 6 bits: opcode class.
    pub a: u8,
    /// Bits 16-17: format selector / addressing mode.
    pub b: u8,
    /// Low 14 bits: sub-opcode of the register-register class.
    pub c: u16,
}

impl Fields {
    pub fn split(word: u32) -> Self {
        Self {
            rs: ((word >> 22) & 0xf) as u8,
            rd: ((word >> 18) & 0xf) as u8,
            rx: ((word >> 14) & 0xf) as u8,
            imm: (word & 0xffff) as u16,
            a: (word >> 26) as u8,
            b: ((word >> 16) & 0x3) as u8,
            c: (word & 0x3fff) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_extracts_every_field() {
        let word = (0x2au32 << 26) | (5 << 22) | (9 << 18) | (3 << 16) | 0x1234;
        let f = Fields::split(word);
        assert_eq!(f.a, 0x2a);
        assert_eq!(f.rs, 5);
        assert_eq!(f.rd, 9);
        assert_eq!(f.b, 3);
        assert_eq!(f.imm, 0x1234);
        assert_eq!(f.c, 0x1234);
    }

    #[test]
    fn rx_straddles_the_immediate() {
        // rx is bits 14-17, overlapping imm[15:14] and b
        let word = 0xf << 14;
        let f = Fields::split(word);
        assert_eq!(f.rx, 0xf);
        assert_eq!(f.b, 3);
        assert_eq!(f.imm, 0xc000);
    }

    #[test]
    fn all_zero_word_is_all_zero_fields() {
        let f = Fields::split(0);
        assert_eq!((f.rs, f.rd, f.rx, f.imm, f.a, f.b, f.c), (0, 0, 0, 0, 0, 0, 0));
    }
}
