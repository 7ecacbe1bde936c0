use std::collections::{BTreeMap, BTreeSet};

/// Word-addresses that start a naming block. Seeded from the header
/// jump table; the per-block sequential label counter resets here.
pub type JumpTargetSet = BTreeSet<u32>;

/// Mapping from word-address to symbolic name.
///
/// `None` marks an address known to be a control-flow target that has
/// not been named yet. Entries are added across both passes and never
/// removed; placeholders are resolved to final names in a dedicated
/// step before the render pass.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: BTreeMap<u32, Option<String>>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `addr` as a control-flow target. Existing names win.
    pub fn note(&mut self, addr: u32) {
        self.entries.entry(addr).or_insert(None);
    }

    /// Name an address, replacing a placeholder or an earlier name.
    pub fn set(&mut self, addr: u32, name: String) {
        self.entries.insert(addr, Some(name));
    }

    pub fn name(&self, addr: u32) -> Option<&str> {
        self.entries.get(&addr).and_then(|n| n.as_deref())
    }

    pub fn is_placeholder(&self, addr: u32) -> bool {
        matches!(self.entries.get(&addr), Some(None))
    }

    /// Operand rendering: the symbolic name if one exists, raw hex otherwise.
    pub fn display(&self, addr: u32) -> String {
        match self.name(addr) {
            Some(n) => n.to_string(),
            None => format!("0x{addr:x}"),
        }
    }

    /// Entries in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<&str>)> + '_ {
        self.entries.iter().map(|(a, n)| (*a, n.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_does_not_clobber_names() {
        let mut t = LabelTable::new();
        t.note(8);
        assert!(t.is_placeholder(8));
        t.set(8, "start_0".into());
        t.note(8);
        assert_eq!(t.name(8), Some("start_0"));
        assert!(!t.is_placeholder(8));
    }

    #[test]
    fn display_falls_back_to_hex() {
        let mut t = LabelTable::new();
        t.set(0x10, "PKT3_NOP".into());
        assert_eq!(t.display(0x10), "PKT3_NOP");
        assert_eq!(t.display(0x2a), "0x2a");
    }
}
