//! Immediate reconstruction rules shared by several instruction classes.
//!
//! The AND-with-mask encodings pack a shift amount in the low bits of the
//! immediate and an inverted complement pattern above it; the widths
//! differ between the 32-bit class (5-bit shift, 11-bit pattern) and the
//! 64-bit class (6-bit shift, 10-bit pattern). These formulas define how
//! firmware constants are reconstructed and must not be "simplified".

/// Treat a 16-bit field as two's-complement.
pub fn sign_extend16(v: u16) -> i32 {
    v as i16 as i32
}

/// 32-bit AND mask: all-ones with the inverted 11-bit pattern shifted in.
pub fn and_mask32(imm: u16) -> u32 {
    let imm = imm as u64;
    (0xffff_ffffu64 ^ ((0x7ff ^ (imm >> 5)) << (imm & 0x1f))) as u32
}

/// 64-bit AND mask: all-ones with the inverted 10-bit pattern shifted in.
pub fn and_mask64(imm: u16) -> u64 {
    let imm = imm as u128;
    (0xffff_ffff_ffff_ffffu128 ^ ((0x3ff ^ (imm >> 6)) << (imm & 0x3f))) as u64
}

/// Shifted OR-immediate, 32-bit class: value in imm[15:5], shift in imm[4:0].
pub fn shifted_imm32(imm: u16) -> u64 {
    ((imm as u64) >> 5) << (imm & 0x1f)
}

/// Shifted OR-immediate, 64-bit class: value in imm[15:6], shift in imm[5:0].
pub fn shifted_imm64(imm: u16) -> u64 {
    ((imm as u64) >> 6) << (imm & 0x3f)
}
