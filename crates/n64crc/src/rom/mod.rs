//! Nintendo 64 ROM image layout and checksum handling
//!
//! A big-endian (`.z64`) image is laid out as:
//! - Header (64 bytes at 0x000-0x03F), CRC1 at 0x10 and CRC2 at 0x14
//! - Boot code (4032 bytes at 0x040-0xFFF), fingerprinted to find the CIC
//! - Game data from 0x1000, of which the first 1 MiB is checksummed

mod crc32;
mod cic;
mod checksum;
mod header;

pub use crc32::{CRC_TABLE, crc32};
pub use cic::{Cic, CicDetection, detect_cic};
pub use checksum::{Accumulator, RomChecksum, calculate_checksum};
pub use header::{HeaderChecksum, PatchOutcome, patch_checksum, read_word, verify_checksum, write_word};

/// Size of the ROM header
pub const HEADER_SIZE: usize = 0x40;
/// Size of the boot code following the header
pub const BOOT_CODE_SIZE: usize = 0x1000 - HEADER_SIZE;

/// Offset of the first stored checksum word
pub const CRC1_OFFSET: usize = 0x10;
/// Offset of the second stored checksum word
pub const CRC2_OFFSET: usize = 0x14;

/// Start of the checksummed region
pub const CHECKSUM_START: usize = 0x1000;
/// Length of the checksummed region (1 MiB)
pub const CHECKSUM_LENGTH: usize = 0x100000;
/// Smallest image the checksum can be calculated for
pub const MIN_ROM_SIZE: usize = CHECKSUM_START + CHECKSUM_LENGTH;
