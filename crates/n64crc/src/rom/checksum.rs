//! N64 ROM checksum calculation
//!
//! The checksum is two 32-bit words computed over the first 1 MiB of game
//! data (0x1000-0x100FFF), stored at 0x10 and 0x14. The seed and one step of
//! the accumulation depend on the CIC the image boots with.

use super::{CHECKSUM_LENGTH, CHECKSUM_START, Cic, HEADER_SIZE, MIN_ROM_SIZE};
use crate::common::{ChecksumError, ChecksumResult};

/// Boot code window read as the second operand by CIC-NUS-6105 images
const CIC6105_AUX_START: usize = HEADER_SIZE + 0x0710;
const CIC6105_AUX_LENGTH: usize = 0x100;

/// Calculated header checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomChecksum {
    pub crc1: u32,
    pub crc2: u32,
}

/// Running state of the checksum over the game data
///
/// All registers start at the CIC seed and wrap modulo 2^32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    pub t1: u32,
    pub t2: u32,
    pub t3: u32,
    /// Number of times `t6` has wrapped (plus the seed)
    pub t4: u32,
    pub t5: u32,
    pub t6: u32,
}

impl Accumulator {
    pub fn new(seed: u32) -> Self {
        Self {
            t1: seed,
            t2: seed,
            t3: seed,
            t4: seed,
            t5: seed,
            t6: seed,
        }
    }

    /// Fold in one word of game data
    ///
    /// `aux` is the 6105 boot code word for this position; every other CIC
    /// passes `None` and mixes in `t5` instead.
    pub fn step(&mut self, d: u32, aux: Option<u32>) {
        let (sum, carried) = self.t6.overflowing_add(d);
        if carried {
            self.t4 = self.t4.wrapping_add(1);
        }
        self.t6 = sum;
        self.t3 ^= d;

        let r = d.rotate_left(d & 0x1F);
        self.t5 = self.t5.wrapping_add(r);

        if self.t2 > d {
            self.t2 ^= r;
        } else {
            self.t2 ^= self.t6 ^ d;
        }

        let mix = aux.unwrap_or(self.t5);
        self.t1 = self.t1.wrapping_add(mix ^ d);
    }

    /// Combine the registers into the two header words
    pub fn finish(&self, cic: Cic) -> RomChecksum {
        match cic {
            Cic::Cic6103 => RomChecksum {
                crc1: (self.t6 ^ self.t4).wrapping_add(self.t3),
                crc2: (self.t5 ^ self.t2).wrapping_add(self.t1),
            },
            Cic::Cic6106 => RomChecksum {
                crc1: self.t6.wrapping_mul(self.t4).wrapping_add(self.t3),
                crc2: self.t5.wrapping_mul(self.t2).wrapping_add(self.t1),
            },
            Cic::Cic6101 | Cic::Cic6102 | Cic::Cic6105 => RomChecksum {
                crc1: self.t6 ^ self.t4 ^ self.t3,
                crc2: self.t5 ^ self.t2 ^ self.t1,
            },
        }
    }
}

fn be_word(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Calculate the header checksum of a ROM image for the given CIC
///
/// # Arguments
/// * `rom_data` - The complete ROM data, at least [`MIN_ROM_SIZE`] bytes
/// * `cic` - Boot chip the image is built for
///
/// # Returns
/// The two checksum words, or `TruncatedImage` if the checksummed region is
/// not fully present. The image is never modified.
pub fn calculate_checksum(rom_data: &[u8], cic: Cic) -> ChecksumResult<RomChecksum> {
    if rom_data.len() < MIN_ROM_SIZE {
        return Err(ChecksumError::truncated(rom_data.len(), MIN_ROM_SIZE));
    }

    let region = &rom_data[CHECKSUM_START..CHECKSUM_START + CHECKSUM_LENGTH];
    let aux = &rom_data[CIC6105_AUX_START..CIC6105_AUX_START + CIC6105_AUX_LENGTH];
    let mut acc = Accumulator::new(cic.seed());

    for (index, chunk) in region.chunks_exact(4).enumerate() {
        let d = be_word(chunk);
        let aux_word = (cic == Cic::Cic6105).then(|| {
            let offset = (index * 4) & 0xFF;
            be_word(&aux[offset..offset + 4])
        });
        acc.step(d, aux_word);
    }

    Ok(acc.finish(cic))
}
