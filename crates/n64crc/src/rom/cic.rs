//! Boot chip (CIC) identification
//!
//! Every retail cartridge carries one of a handful of CIC lockout chips, and
//! the boot code at 0x040-0xFFF is matched to it. The CRC-32 of that boot
//! code is therefore enough to tell which CIC the image expects, which in
//! turn selects the checksum seed and algorithm variant.

use super::{BOOT_CODE_SIZE, HEADER_SIZE, crc32};
use crate::common::{ChecksumError, ChecksumResult};
use std::fmt;
use std::str::FromStr;

/// Known CIC-NUS boot chip variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cic {
    Cic6101,
    Cic6102,
    Cic6103,
    Cic6105,
    Cic6106,
}

impl Cic {
    pub const ALL: [Cic; 5] = [
        Cic::Cic6101,
        Cic::Cic6102,
        Cic::Cic6103,
        Cic::Cic6105,
        Cic::Cic6106,
    ];

    /// Variant assumed when the boot code is not recognised
    pub const FALLBACK: Cic = Cic::Cic6105;

    /// Look up the CIC whose boot code has the given CRC-32
    pub fn from_fingerprint(crc: u32) -> Option<Self> {
        match crc {
            0x6170A4A1 => Some(Cic::Cic6101),
            0x90BB6CB5 => Some(Cic::Cic6102),
            0x0B050EE0 => Some(Cic::Cic6103),
            0x98BC2C86 => Some(Cic::Cic6105),
            0xACC8580A => Some(Cic::Cic6106),
            _ => None,
        }
    }

    /// Initial value of every accumulator register
    pub fn seed(&self) -> u32 {
        match self {
            // 6101 boots with the 6102 seed
            Cic::Cic6101 | Cic::Cic6102 => 0xF8CA4DDC,
            Cic::Cic6103 => 0xA3886759,
            Cic::Cic6105 => 0xDF26F436,
            Cic::Cic6106 => 0x1FEA617A,
        }
    }

    /// Numeric part number, e.g. `6102`
    pub fn code(&self) -> u16 {
        match self {
            Cic::Cic6101 => 6101,
            Cic::Cic6102 => 6102,
            Cic::Cic6103 => 6103,
            Cic::Cic6105 => 6105,
            Cic::Cic6106 => 6106,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cic::Cic6101 => "CIC-NUS-6101",
            Cic::Cic6102 => "CIC-NUS-6102",
            Cic::Cic6103 => "CIC-NUS-6103",
            Cic::Cic6105 => "CIC-NUS-6105",
            Cic::Cic6106 => "CIC-NUS-6106",
        }
    }
}

impl fmt::Display for Cic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for Cic {
    type Error = ChecksumError;

    fn try_from(code: u16) -> ChecksumResult<Self> {
        Cic::ALL
            .into_iter()
            .find(|cic| cic.code() == code)
            .ok_or_else(|| ChecksumError::unsupported(Some(u32::from(code))))
    }
}

impl FromStr for Cic {
    type Err = ChecksumError;

    /// Accepts `6102`, `CIC-NUS-6102` or `nus-6102`, ignoring case
    fn from_str(s: &str) -> ChecksumResult<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let rest = upper.strip_prefix("CIC-").unwrap_or(&upper);
        let digits = rest.strip_prefix("NUS-").unwrap_or(rest);

        let code: u32 = digits
            .parse()
            .map_err(|_| ChecksumError::unsupported(None))?;
        u16::try_from(code)
            .map_err(|_| ChecksumError::unsupported(Some(code)))
            .and_then(Cic::try_from)
    }
}

/// Result of fingerprinting the boot code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CicDetection {
    /// CRC-32 of the boot code region
    pub fingerprint: u32,
    /// Matching CIC, if the fingerprint is known
    pub cic: Option<Cic>,
}

impl CicDetection {
    pub fn is_known(&self) -> bool {
        self.cic.is_some()
    }

    /// The detected CIC, or [`Cic::FALLBACK`] when detection failed
    pub fn cic_or_default(&self) -> Cic {
        self.cic.unwrap_or(Cic::FALLBACK)
    }
}

/// Identify the CIC an image was built for
///
/// Never fails: an image too short to contain the whole boot code is
/// fingerprinted over the bytes that are present.
pub fn detect_cic(rom_data: &[u8]) -> CicDetection {
    let end = (HEADER_SIZE + BOOT_CODE_SIZE).min(rom_data.len());
    let start = HEADER_SIZE.min(end);
    let fingerprint = crc32(&rom_data[start..end]);

    CicDetection {
        fingerprint,
        cic: Cic::from_fingerprint(fingerprint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Zeroed boot code whose last word forces the CRC to a CIC fingerprint
    fn boot_code_image(tail: u32) -> Vec<u8> {
        let mut data = vec![0u8; 0x1000];
        data[0xFFC..0x1000].copy_from_slice(&tail.to_be_bytes());
        data
    }

    #[test]
    fn test_fingerprint_table() {
        assert_eq!(Cic::from_fingerprint(0x6170A4A1), Some(Cic::Cic6101));
        assert_eq!(Cic::from_fingerprint(0x90BB6CB5), Some(Cic::Cic6102));
        assert_eq!(Cic::from_fingerprint(0x0B050EE0), Some(Cic::Cic6103));
        assert_eq!(Cic::from_fingerprint(0x98BC2C86), Some(Cic::Cic6105));
        assert_eq!(Cic::from_fingerprint(0xACC8580A), Some(Cic::Cic6106));
    }

    #[test]
    fn test_unknown_fingerprint() {
        for crc in [0, 0xFFFFFFFF, 0x6170A4A0, 0xE8B8467D] {
            assert_eq!(Cic::from_fingerprint(crc), None);
        }
    }

    #[test]
    fn test_seeds() {
        assert_eq!(Cic::Cic6101.seed(), Cic::Cic6102.seed());
        assert_eq!(Cic::Cic6102.seed(), 0xF8CA4DDC);
        assert_eq!(Cic::Cic6103.seed(), 0xA3886759);
        assert_eq!(Cic::Cic6105.seed(), 0xDF26F436);
        assert_eq!(Cic::Cic6106.seed(), 0x1FEA617A);
    }

    #[test]
    fn test_detect_forged_boot_code() {
        let cases = [
            (0xE26656B7, Cic::Cic6101),
            (0x892679FB, Cic::Cic6102),
            (0x875E923F, Cic::Cic6103),
            (0x8FE65E21, Cic::Cic6105),
            (0xED93DCB9, Cic::Cic6106),
        ];
        for (tail, expected) in cases {
            let detection = detect_cic(&boot_code_image(tail));
            assert_eq!(detection.cic, Some(expected));
            assert_eq!(detection.cic_or_default(), expected);
        }
    }

    #[test]
    fn test_detect_zero_boot_code_defaults() {
        let detection = detect_cic(&[0u8; 0x1000]);
        assert_eq!(detection.fingerprint, 0xE8B8467D);
        assert!(!detection.is_known());
        assert_eq!(detection.cic_or_default(), Cic::Cic6105);
    }

    #[test]
    fn test_detect_ignores_header_and_game_data() {
        let mut data = boot_code_image(0x892679FB);
        data[..0x40].fill(0xAA);
        data.extend_from_slice(&[0x55; 0x100]);
        assert_eq!(detect_cic(&data).cic, Some(Cic::Cic6102));
    }

    #[test]
    fn test_detect_short_image() {
        assert_eq!(detect_cic(&[]).cic, None);
        assert_eq!(detect_cic(&[0u8; 0x20]).fingerprint, 0);
        assert_eq!(detect_cic(&[0u8; 0x800]).cic, None);
    }

    #[test]
    fn test_parse_cic() {
        assert_eq!("6102".parse::<Cic>().unwrap(), Cic::Cic6102);
        assert_eq!("CIC-NUS-6105".parse::<Cic>().unwrap(), Cic::Cic6105);
        assert_eq!("cic-nus-6106".parse::<Cic>().unwrap(), Cic::Cic6106);
        assert_eq!("nus-6103".parse::<Cic>().unwrap(), Cic::Cic6103);
        assert!(matches!(
            "6104".parse::<Cic>(),
            Err(ChecksumError::UnsupportedBootChip { code: Some(6104) })
        ));
        assert!("garbage".parse::<Cic>().is_err());
    }

    #[test]
    fn test_code_round_trip() {
        for cic in Cic::ALL {
            assert_eq!(Cic::try_from(cic.code()).unwrap(), cic);
            assert_eq!(cic.to_string(), format!("CIC-NUS-{}", cic.code()));
        }
    }
}
