use serde::Serialize;

use crate::fields::Fields;
use crate::labels::LabelTable;

/// Most recent "register loaded with an immediate" observation.
///
/// Write side of the indirect-branch heuristic: every register-immediate
/// add overwrites it, a register-indirect branch reads it. Lives for one
/// decode pass and must be reset between passes so the side effects
/// replay identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchMemory {
    last: Option<(u8, u16)>,
}

impl BranchMemory {
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn record(&mut self, rd: u8, imm: u16) {
        self.last = Some((rd, imm));
    }

    /// The remembered immediate, if the last load targeted `rs`.
    pub fn loaded_into(&self, rs: u8) -> Option<u16> {
        match self.last {
            Some((r, imm)) if r == rs => Some(imm),
            _ => None,
        }
    }
}

/// One decoded instruction. Exactly one variant per dispatch rule;
/// `Raw` is the total fallback so decoding never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Instr {
    Nop,
    /// add with r0 (always zero), rendered as a register move.
    MovRR { rx: u8, rs: u8 },
    AluRRR { mn: &'static str, rx: u8, rs: u8, rd: u8 },
    /// lsra/lsrad: logical shift right and AND.
    ShiftMask { mn: &'static str, rd: u8, rs: u8, shift: u8, mask: u16 },
    /// AND with the reconstructed all-ones-around-a-hole mask.
    AndMask { mn: &'static str, rd: u8, rs: u8, val: u64 },
    OrShifted { mn: &'static str, rd: u8, rs: u8, val: u64 },
    AluRI { mn: &'static str, rd: u8, rs: u8, imm: u16 },
    /// Sign-extended arithmetic immediate.
    AluRIS { mn: &'static str, rd: u8, rs: u8, imm: i32 },
    /// Sign-extended logical immediate, reinterpreted as unsigned 32/64-bit.
    AluRIL { mn: &'static str, rd: u8, rs: u8, val: u64 },
    MovImm { rd: u8, val: u64 },
    MovImmS { rd: u8, imm: i32 },
    B { target: u32 },
    /// Register-indirect branch.
    Br { rs: u8 },
    Btab,
    Bl { target: u32 },
    Ret,
    /// cbz/cbnz and their loosely-matched "?" variants, PC-relative.
    Cb { mn: &'static str, rs: u8, target: u32 },
    LdSt { mn: &'static str, reg: u8, mode: u8, base: u8, off: u16 },
    /// Store immediate: the value rides in the rs field.
    StImm { val: u8, mode: u8, base: u8, off: u16 },
    MovFromCtr { rd: u8 },
    MovToCtr { rs: u8 },
    Push { rs: u8 },
    Pop { rd: u8 },
    Raw { word: u32, fields: Fields, regreg: bool },
}

impl Instr {
    /// btab and ret end a block; the listing prints a separating blank line.
    pub fn ends_block(&self) -> bool {
        matches!(self, Instr::Btab | Instr::Ret)
    }
}

pub trait Decoder {
    /// Total decode of one word at a word-address. Side effects: may
    /// register branch targets in `labels` and read/update `mem`.
    fn decode(&self, labels: &mut LabelTable, mem: &mut BranchMemory, addr: u32, word: u32) -> Instr;
}
