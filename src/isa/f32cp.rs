use tracing::debug;

use crate::decoder::{BranchMemory, Decoder, Instr};
use crate::fields::Fields;
use crate::imm::{and_mask32, and_mask64, shifted_imm32, shifted_imm64, sign_extend16};
use crate::labels::LabelTable;

/// Shared opcode table, indexed by `a` for the register-immediate forms
/// and by `c` for the register-register forms. Indices 17-31 are the
/// 64-bit "d"-suffixed variants. Empty slots are encodings this firmware
/// never exercises; they fall back to the raw `dw` rendering.
const OPC: [Option<&str>; 32] = [
    None, Some("add"), Some("sub"), None,
    Some("lsl"), Some("lsr"), None, None,
    None, Some("and"), Some("orr"), Some("eor"),
    Some("seteq"), Some("setne"), Some("setgt"), Some("setge"),
    Some("mul"),
    Some("addd"), Some("subd"), None,
    Some("lsld"), Some("lsrd"), None, None,
    None, Some("andd"), Some("orrd"), Some("eord"),
    Some("seteqd"), Some("setned"), Some("setgtd"), Some("setged"),
];

/// Decoder for the fixed-width 32-bit F32 microengine encoding.
///
/// Dispatch is ordered; first match wins. The classes are mutually
/// exclusive by construction of the fields tested, but the order below
/// is the documented priority and must not be shuffled.
pub struct F32Decoder;

impl F32Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for F32Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for F32Decoder {
    fn decode(&self, labels: &mut LabelTable, mem: &mut BranchMemory, addr: u32, word: u32) -> Instr {
        let f = Fields::split(word);
        let Fields { rs, rd, rx, imm, a, b, c } = f;

        if a == 0 {
            return Instr::Nop;
        }

        if a == 0x1f {
            // Register-register class, selected by the 14-bit sub-opcode.
            if c == 1 && rd == 0 {
                // add with r0 (always zero) reads as a register move
                return Instr::MovRR { rx, rs };
            }
            if let Some(mn) = OPC.get(c as usize).copied().flatten() {
                return Instr::AluRRR { mn, rx, rs, rd };
            }
            return Instr::Raw { word, fields: f, regreg: true };
        }

        // Logical-immediate encodings with packed shift/mask immediates.
        match (a, b) {
            (0x06, 0) => {
                return Instr::ShiftMask { mn: "lsra", rd, rs, shift: (imm & 0x1f) as u8, mask: imm >> 5 };
            }
            (0x07, 0) => {
                return Instr::AndMask { mn: "and", rd, rs, val: and_mask32(imm) as u64 };
            }
            (0x08, 0) => {
                let val = shifted_imm32(imm);
                return if rs == 0 {
                    Instr::MovImm { rd, val }
                } else {
                    Instr::OrShifted { mn: "orr", rd, rs, val }
                };
            }
            (0x16, 0) => {
                return Instr::ShiftMask { mn: "lsrad", rd, rs, shift: (imm & 0x3f) as u8, mask: imm >> 6 };
            }
            (0x17, 0) => {
                return Instr::AndMask { mn: "andd", rd, rs, val: and_mask64(imm) };
            }
            (0x18, 0) => {
                let val = shifted_imm64(imm);
                return if rs == 0 {
                    Instr::MovImm { rd, val }
                } else {
                    Instr::OrShifted { mn: "orrd", rd, rs, val }
                };
            }
            _ => {}
        }

        // Register-immediate forms, raw 16-bit immediate.
        if b == 0 {
            if let Some(mn) = OPC.get(a as usize).copied().flatten() {
                if a == 0x01 {
                    // write side of the indirect-branch heuristic
                    mem.record(rd, imm);
                }
                if a == 0x01 && rs == 0 {
                    return Instr::MovImm { rd, val: imm as u64 };
                }
                return Instr::AluRI { mn, rd, rs, imm };
            }
        }

        // Register-immediate forms, sign-extended immediate.
        if b == 1 {
            let arith = match a {
                0x01 => Some("add"),
                0x02 => Some("sub"),
                0x11 => Some("addd"),
                0x12 => Some("subd"),
                _ => None,
            };
            if let Some(mn) = arith {
                let simm = sign_extend16(imm);
                if a == 0x01 && rs == 0 {
                    return Instr::MovImmS { rd, imm: simm };
                }
                return Instr::AluRIS { mn, rd, rs, imm: simm };
            }
            let logic32 = match a {
                0x09 => Some("and"),
                0x0a => Some("orr"),
                0x0b => Some("eor"),
                _ => None,
            };
            if let Some(mn) = logic32 {
                return Instr::AluRIL { mn, rd, rs, val: sign_extend16(imm) as u32 as u64 };
            }
            let logic64 = match a {
                0x19 => Some("andd"),
                0x1a => Some("orrd"),
                0x1b => Some("eord"),
                _ => None,
            };
            if let Some(mn) = logic64 {
                return Instr::AluRIL { mn, rd, rs, val: sign_extend16(imm) as i64 as u64 };
            }
        }

        // Control flow, matched on exact field tuples.
        if (a, b, rs, rd) == (0x20, 0, 0, 0) {
            let target = imm as u32;
            labels.note(target);
            return Instr::B { target };
        }
        if (a, b, rd, imm) == (0x21, 0, 0, 0) {
            // Register-indirect branch. Best effort: if the source register
            // still holds the last immediate we saw loaded, that value is a
            // dispatch-table base worth naming. Misfires if the register was
            // reloaded from an unrelated source in between.
            if let Some(base) = mem.loaded_into(rs) {
                debug!(base, "promoting indirect-branch base to jump-table label");
                labels.set(base as u32, format!("_jmptab_0x{base:x}"));
            }
            return Instr::Br { rs };
        }
        if (a, b, rs, rd, imm) == (0x22, 0, 0, 0, 0) {
            return Instr::Btab;
        }
        if (a, b, rs, rd) == (0x23, 0, 0, 0) {
            let target = imm as u32;
            labels.note(target);
            return Instr::Bl { target };
        }
        if (a, b, rs, rd, imm) == (0x24, 0, 0, 0, 0) {
            return Instr::Ret;
        }
        if a == 0x25 || a == 0x26 {
            // Compare-and-branch, PC-relative in word units. The strict
            // forms pin b and rd to zero; anything else keeps the same
            // target rule but renders with a "?" marker.
            let target = addr.wrapping_add(sign_extend16(imm) as u32);
            labels.note(target);
            let strict = b == 0 && rd == 0;
            let mn = match (a, strict) {
                (0x25, true) => "cbz",
                (0x25, false) => "cbz?",
                (0x26, true) => "cbnz",
                _ => "cbnz?",
            };
            return Instr::Cb { mn, rs, target };
        }

        // Load immediate: b selects which half is forced to 0 or all-ones.
        if a == 0x30 && rs == 0 {
            let val = match b {
                0 => imm as u64,
                1 => imm as u64 | 0xffff_0000,
                2 => (imm as u64) << 16,
                _ => ((imm as u64) << 16) | 0xffff,
            };
            return Instr::MovImm { rd, val };
        }

        // Load/store: stm is store-multiple (ctr = count) for streaming.
        if (0x31..=0x35).contains(&a) {
            let mn = ["ldw", "ldd", "stw", "std", "stm"][(a - 0x31) as usize];
            let store = a >= 0x33;
            let (reg, base) = if store { (rs, rd) } else { (rd, rs) };
            return Instr::LdSt { mn, reg, mode: b, base, off: imm };
        }

        if a == 0x36 {
            return Instr::StImm { val: rs, mode: b, base: rd, off: imm };
        }

        // Counter register forms.
        if a == 0x37 && imm == 0 {
            match (b, rs, rd) {
                (2, 0, _) => return Instr::MovFromCtr { rd },
                (3, _, 0) => return Instr::MovToCtr { rs },
                (1, _, 0) => return Instr::Push { rs },
                (0, 0, _) => return Instr::Pop { rd },
                _ => {}
            }
        }

        Instr::Raw { word, fields: f, regreg: false }
    }
}
