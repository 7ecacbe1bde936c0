use std::fmt::Write as _;

use tracing::{debug, info};

use crate::decoder::{BranchMemory, Decoder};
use crate::disasm::fmt_instr;
use crate::image::read_word;
use crate::isa::f32cp::F32Decoder;
use crate::labels::{JumpTargetSet, LabelTable};
use crate::pkt::PktTable;

/// Owns the mutable decode state shared by the seeder and both passes:
/// the label table and the set of jump-table block starts.
pub struct Driver {
    pub labels: LabelTable,
    pub jtab: JumpTargetSet,
    dec: F32Decoder,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            labels: LabelTable::new(),
            jtab: JumpTargetSet::new(),
            dec: F32Decoder::new(),
        }
    }

    /// Parse the header jump table: each word packs a word-address in
    /// the low 16 bits and a packet opcode in bits 20-27. Pre-seeds the
    /// label table and block-start set, and returns the leading comment
    /// block listing every entry with its byte offset.
    pub fn seed_jump_table(&mut self, header: &[u8], pkts: &PktTable) -> String {
        let mut out = String::new();
        out.push_str(";-----------jmptab----------------\n");
        for off in (0..header.len() / 4 * 4).step_by(4) {
            let Some(v) = read_word(header, off) else { break };
            let addr = v & 0xffff;
            let opcode = ((v >> 20) & 0xff) as u8;
            let name = pkts.name(opcode);
            debug!(addr, %name, "jump-table entry");
            self.labels.set(addr, name.clone());
            self.jtab.insert(addr);
            let _ = writeln!(out, "; {} = {:x}", name, addr * 4);
        }
        out.push_str(";---------------------------------\n");
        out
    }

    /// Full two-pass disassembly of the code region.
    pub fn render(&mut self, code: &[u8]) -> String {
        let words: Vec<u32> = code
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        // Pass 1: run the decoder over everything purely for its side
        // effects, so every branch/call target is in the table before
        // any name is assigned.
        let mut mem = BranchMemory::default();
        for (i, &w) in words.iter().enumerate() {
            let _ = self.dec.decode(&mut self.labels, &mut mem, i as u32, w);
        }
        info!(words = words.len(), labels = self.labels.len(), "discovery pass done");

        // Name resolution: anonymous targets get sequential names scoped
        // to the nearest preceding jump-table entry.
        let mut prefix = "start".to_string();
        let mut counter = 0usize;
        for addr in 0..words.len() as u32 {
            if self.jtab.contains(&addr) {
                counter = 0;
                if let Some(name) = self.labels.name(addr) {
                    prefix = name.to_string();
                }
            }
            if self.labels.is_placeholder(addr) {
                self.labels.set(addr, format!("{prefix}_{counter}"));
                counter += 1;
            }
        }

        // Pass 2: decode again with a fresh branch memory (the side
        // effects must replay identically) and emit the final text.
        let mut out = String::new();
        mem.reset();
        for (i, &w) in words.iter().enumerate() {
            let addr = i as u32;
            if let Some(name) = self.labels.name(addr) {
                let _ = writeln!(out, "{name}:");
            }
            let instr = self.dec.decode(&mut self.labels, &mut mem, addr, w);
            let _ = writeln!(out, "{:04x}    {w:08x}    {}", i * 4, fmt_instr(&instr, &self.labels));
            if instr.ends_block() {
                out.push('\n');
            }
        }
        out
    }

    /// Seed from the header region, then render the code region.
    pub fn disassemble(&mut self, header: &[u8], code: &[u8], pkts: &PktTable) -> String {
        let mut out = self.seed_jump_table(header, pkts);
        out.push_str(&self.render(code));
        out
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}
