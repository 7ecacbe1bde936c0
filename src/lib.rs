pub mod decoder;
pub mod disasm;
pub mod fields;
pub mod image;
pub mod imm;
pub mod labels;
pub mod listing;
pub mod pkt;

pub mod isa {
    pub mod f32cp; // F32 command-processor microengine encoding
}

pub use image::{Firmware, Layout};
pub use labels::LabelTable;
pub use listing::Driver;
pub use pkt::PktTable;
