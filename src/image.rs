use std::fmt::Write as _;
use std::io::Read as _;
use std::path::Path;

use tracing::debug;

/// zstd frame magic at the start of a compressed image.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Byte offsets of the two regions of interest. The defaults are the
/// constants of the one firmware layout this was written against; they
/// are plain configuration so other layouts can be probed from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub jtab_start: usize,
    pub jtab_end: usize,
    pub code_start: usize,
    pub code_end: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            jtab_start: 0x40200,
            jtab_end: 0x40357,
            code_start: 0x100 + 64 * 4,
            code_end: 0x7a80,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error("firmware image too short: need 0x{need:x} bytes, have 0x{have:x}")]
    Truncated { need: usize, have: usize },
    #[error("zstd decompression failed: {0}")]
    Zstd(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fully-resident firmware byte buffer, decompressed if needed.
#[derive(Debug, Clone)]
pub struct Firmware {
    bytes: Vec<u8>,
}

impl Firmware {
    /// Wrap a raw buffer, undoing the zstd wrapper when the magic is present.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self, ImageError> {
        if raw.len() >= 4 && raw[..4] == ZSTD_MAGIC {
            debug!(compressed = raw.len(), "zstd magic found, decompressing image");
            let mut dec = ruzstd::decoding::StreamingDecoder::new(&raw[..])
                .map_err(|e| ImageError::Zstd(e.to_string()))?;
            let mut bytes = Vec::new();
            dec.read_to_end(&mut bytes)
                .map_err(|e| ImageError::Zstd(e.to_string()))?;
            Ok(Self { bytes })
        } else {
            Ok(Self { bytes: raw })
        }
    }

    pub fn load(path: &Path) -> Result<Self, ImageError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A fixed byte range. Out-of-range requests are a fatal input error;
    /// there is no meaningful partial disassembly of a truncated stream.
    pub fn region(&self, start: usize, end: usize) -> Result<&[u8], ImageError> {
        if end > self.bytes.len() || start > end {
            return Err(ImageError::Truncated { need: end, have: self.bytes.len() });
        }
        Ok(&self.bytes[start..end])
    }

    pub fn jtab_region(&self, layout: &Layout) -> Result<&[u8], ImageError> {
        self.region(layout.jtab_start, layout.jtab_end)
    }

    pub fn code_region(&self, layout: &Layout) -> Result<&[u8], ImageError> {
        self.region(layout.code_start, layout.code_end)
    }
}

/// Little-endian word at a byte offset, `None` past the end.
pub fn read_word(data: &[u8], off: usize) -> Option<u32> {
    data.get(off..off + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Raw dump: four little-endian words per 16-byte row, eight hex digits
/// each, no separators. A ragged tail shorter than a word is dropped.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for row in data.chunks(16) {
        for w in row.chunks_exact(4) {
            let v = u32::from_le_bytes([w[0], w[1], w[2], w[3]]);
            let _ = write!(out, "{v:08x}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn passthrough_without_magic() {
        let fw = Firmware::from_bytes(vec![1, 2, 3, 4, 5]).unwrap();
        assert_eq!(fw.len(), 5);
        assert_eq!(fw.region(1, 4).unwrap(), &[2, 3, 4]);
    }

    #[test]
    fn truncated_region_is_fatal() {
        let fw = Firmware::from_bytes(vec![0u8; 8]).unwrap();
        match fw.region(0, 16) {
            Err(ImageError::Truncated { need, have }) => {
                assert_eq!(need, 16);
                assert_eq!(have, 8);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn garbage_after_magic_is_a_zstd_error() {
        let mut raw = ZSTD_MAGIC.to_vec();
        raw.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(Firmware::from_bytes(raw), Err(ImageError::Zstd(_))));
    }

    #[test]
    fn read_word_is_little_endian_and_bounded() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xff];
        assert_eq!(read_word(&data, 0), Some(0x12345678));
        assert_eq!(read_word(&data, 2), None);
    }

    #[test]
    fn hex_dump_packs_four_words_per_row() {
        let mut data = Vec::new();
        for v in [1u32, 2, 3, 4, 5] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let dump = hex_dump(&data);
        assert_eq!(dump, "00000001000000020000000300000004\n00000005\n");
    }
}
