use crate::decoder::Instr;
use crate::labels::LabelTable;

/// Addressing-mode prefix of the load/store operand, indexed by `b`.
const MODE: [&str; 4] = ["", "reg", "mem", "unk"];

/// Render one decoded instruction. Branch operands consult the label
/// table and fall back to raw hex for unnamed targets.
pub fn fmt_instr(i: &Instr, labels: &LabelTable) -> String {
    match *i {
        Instr::Nop => "nop".to_string(),
        Instr::MovRR { rx, rs } => format!("mov r{rx}, r{rs}"),
        Instr::AluRRR { mn, rx, rs, rd } => format!("{mn} r{rx}, r{rs}, r{rd}"),
        Instr::ShiftMask { mn, rd, rs, shift, mask } => {
            format!("{mn} r{rd}, r{rs}, #{shift}, #0x{mask:x}")
        }
        Instr::AndMask { mn, rd, rs, val } => format!("{mn} r{rd}, r{rs}, #0x{val:x}"),
        Instr::OrShifted { mn, rd, rs, val } => format!("{mn} r{rd}, r{rs}, #0x{val:x}"),
        Instr::AluRI { mn, rd, rs, imm } => {
            if mn.starts_with("ls") {
                // shift counts read better in decimal
                format!("{mn} r{rd}, r{rs}, #{imm}")
            } else {
                format!("{mn} r{rd}, r{rs}, #0x{imm:x}")
            }
        }
        Instr::AluRIS { mn, rd, rs, imm } => {
            if imm < 0 {
                format!("{mn} r{rd}, r{rs}, #-0x{:x}", -(imm as i64))
            } else {
                format!("{mn} r{rd}, r{rs}, #0x{imm:x}")
            }
        }
        Instr::AluRIL { mn, rd, rs, val } => format!("{mn} r{rd}, r{rs}, #0x{val:x}"),
        Instr::MovImm { rd, val } => format!("mov r{rd}, #0x{val:x}"),
        Instr::MovImmS { rd, imm } => {
            if imm < 0 {
                format!("mov r{rd}, #-0x{:x}", -(imm as i64))
            } else {
                format!("mov r{rd}, #0x{imm:x}")
            }
        }
        Instr::B { target } => format!("b {}", labels.display(target)),
        Instr::Br { rs } => format!("b r{rs}"),
        Instr::Btab => "btab".to_string(),
        Instr::Bl { target } => format!("bl {}", labels.display(target)),
        Instr::Ret => "ret".to_string(),
        Instr::Cb { mn, rs, target } => format!("{mn} r{rs}, {}", labels.display(target)),
        Instr::LdSt { mn, reg, mode, base, off } => {
            format!("{mn} r{reg}, {}[r{base}, #0x{off:x}]", MODE[(mode & 3) as usize])
        }
        Instr::StImm { val, mode, base, off } => {
            format!("stw #0x{val:x}, {}[r{base}, #0x{off:x}]", MODE[(mode & 3) as usize])
        }
        Instr::MovFromCtr { rd } => format!("mov r{rd}, ctr"),
        Instr::MovToCtr { rs } => format!("mov ctr, r{rs}"),
        Instr::Push { rs } => format!("push r{rs}"),
        Instr::Pop { rd } => format!("pop r{rd}"),
        Instr::Raw { word, fields, regreg } => {
            if regreg {
                format!(
                    "  dw 0x{word:x}  #rs={} rd={} rx={} a=0x{:x} c=0x{:x}",
                    fields.rs, fields.rd, fields.rx, fields.a, fields.c
                )
            } else {
                format!(
                    "  dw 0x{word:x}  #rs={} rd={} a=0x{:x} b=0x{:x}, imm=0x{:x}",
                    fields.rs, fields.rd, fields.a, fields.b, fields.imm
                )
            }
        }
    }
}
