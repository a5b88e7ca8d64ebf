//! Stored checksum words in the ROM header
//!
//! CRC1 and CRC2 are big-endian words at 0x10 and 0x14. Repairing an image
//! touches those eight bytes and nothing else.

use super::{CRC1_OFFSET, CRC2_OFFSET, RomChecksum};
use crate::common::{ChecksumError, ChecksumResult};

/// Read a big-endian word, or `None` if it runs past the end of `data`
pub fn read_word(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Write a big-endian word; returns `false` if it does not fit
pub fn write_word(data: &mut [u8], offset: usize, value: u32) -> bool {
    let Some(end) = offset.checked_add(4) else {
        return false;
    };
    match data.get_mut(offset..end) {
        Some(bytes) => {
            bytes.copy_from_slice(&value.to_be_bytes());
            true
        }
        None => false,
    }
}

/// Checksum words as currently stored in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChecksum {
    pub crc1: u32,
    pub crc2: u32,
}

impl HeaderChecksum {
    pub fn read(rom_data: &[u8]) -> ChecksumResult<Self> {
        let truncated = || ChecksumError::truncated(rom_data.len(), CRC2_OFFSET + 4);
        Ok(Self {
            crc1: read_word(rom_data, CRC1_OFFSET).ok_or_else(truncated)?,
            crc2: read_word(rom_data, CRC2_OFFSET).ok_or_else(truncated)?,
        })
    }
}

/// Comparison of the stored header words against a calculated checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Header words before any patching
    pub stored: HeaderChecksum,
    pub crc1_matches: bool,
    pub crc2_matches: bool,
}

impl PatchOutcome {
    fn compare(stored: HeaderChecksum, calculated: &RomChecksum) -> Self {
        Self {
            stored,
            crc1_matches: stored.crc1 == calculated.crc1,
            // CRC2 is checked against its own field, not against CRC1
            crc2_matches: stored.crc2 == calculated.crc2,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.crc1_matches && self.crc2_matches
    }
}

/// Compare the header against `calculated` without modifying the image
pub fn verify_checksum(rom_data: &[u8], calculated: &RomChecksum) -> ChecksumResult<PatchOutcome> {
    let stored = HeaderChecksum::read(rom_data)?;
    Ok(PatchOutcome::compare(stored, calculated))
}

/// Overwrite whichever header word differs from `calculated`
pub fn patch_checksum(rom_data: &mut [u8], calculated: &RomChecksum) -> ChecksumResult<PatchOutcome> {
    let outcome = verify_checksum(rom_data, calculated)?;

    // Both offsets were just read, so the writes cannot fall outside the image
    if !outcome.crc1_matches {
        write_word(rom_data, CRC1_OFFSET, calculated.crc1);
    }
    if !outcome.crc2_matches {
        write_word(rom_data, CRC2_OFFSET, calculated.crc2);
    }

    Ok(outcome)
}
