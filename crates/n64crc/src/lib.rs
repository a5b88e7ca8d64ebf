//! n64crc - Nintendo 64 ROM header checksum tool
//!
//! This library identifies the boot chip (CIC) a big-endian N64 ROM image was
//! built for, recomputes the two checksum words stored in its header and
//! repairs them in place.
//!
//! ## Architecture
//!
//! - **ROM** (`rom/`): image layout, CRC-32 fingerprinting, CIC detection,
//!   the checksum engine and header access
//! - **Driver** (`driver/`): the identify → checksum → patch pipeline and
//!   file handling
//! - **Common** (`common/`): shared error types

pub mod common;
pub mod rom;
pub mod driver;

// Re-exports for convenience
pub use common::{ChecksumError, ChecksumResult};
pub use rom::{Cic, CicDetection, RomChecksum, calculate_checksum, detect_cic};
pub use driver::{RepairOptions, RepairReport, WordStatus, repair_file, repair_image};
