//! Repair pipeline orchestration
//!
//! Ties together CIC detection, the checksum engine and header patching, and
//! handles loading and saving image files.

use crate::common::{ChecksumError, ChecksumResult};
use crate::rom::{
    Cic, CicDetection, HeaderChecksum, RomChecksum, calculate_checksum, detect_cic, patch_checksum,
    verify_checksum,
};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::Path;

/// Options controlling how an image is identified and repaired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    /// Use this CIC instead of detecting it
    pub cic: Option<Cic>,
    /// CIC assumed when detection fails; `None` makes that an error
    pub fallback: Option<Cic>,
    /// Compare only, never modify the image
    pub dry_run: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            cic: None,
            fallback: Some(Cic::FALLBACK),
            dry_run: false,
        }
    }
}

/// State of one header word after a repair run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStatus {
    /// Stored value already correct
    Good,
    /// Stored value was wrong and has been rewritten
    Fixed,
    /// Stored value is wrong and was left alone (dry run)
    Bad,
}

impl WordStatus {
    fn new(matches: bool, dry_run: bool) -> Self {
        match (matches, dry_run) {
            (true, _) => WordStatus::Good,
            (false, false) => WordStatus::Fixed,
            (false, true) => WordStatus::Bad,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WordStatus::Good => "Good",
            WordStatus::Fixed => "Bad, fixed",
            WordStatus::Bad => "Bad",
        }
    }
}

/// Outcome of checking (and possibly repairing) one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairReport {
    pub detection: CicDetection,
    /// CIC the checksum was calculated with
    pub cic: Cic,
    /// Whether `cic` was forced by the caller rather than detected
    pub forced: bool,
    /// Header words before repair
    pub stored: HeaderChecksum,
    pub calculated: RomChecksum,
    pub crc1: WordStatus,
    pub crc2: WordStatus,
}

impl RepairReport {
    /// Whether the header was rewritten
    pub fn is_modified(&self) -> bool {
        self.crc1 == WordStatus::Fixed || self.crc2 == WordStatus::Fixed
    }

    /// Whether the image had a correct header to begin with
    pub fn is_valid(&self) -> bool {
        self.crc1 == WordStatus::Good && self.crc2 == WordStatus::Good
    }
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BootChip: {}", self.cic)?;
        if self.forced {
            write!(f, " (forced)")?;
        } else if !self.detection.is_known() {
            write!(f, " (unidentified, assumed)")?;
        }
        writeln!(f)?;

        let words = [
            (1, self.stored.crc1, self.calculated.crc1, self.crc1),
            (2, self.stored.crc2, self.calculated.crc2, self.crc2),
        ];
        for (n, stored, calculated, status) in words {
            writeln!(f, "CRC {n}: 0x{stored:08X}")?;
            writeln!(f, "Calculated CRC {n}: 0x{calculated:08X} ({})", status.label())?;
        }
        Ok(())
    }
}

/// Pick the CIC to checksum with, or `None` if there is none to use
fn select_cic(detection: &CicDetection, options: &RepairOptions) -> Option<Cic> {
    if let Some(cic) = options.cic {
        return Some(cic);
    }
    if detection.cic.is_none() {
        match options.fallback {
            Some(fallback) => warn!(
                "unable to identify CIC (boot code CRC 0x{:08X}), defaulting to {fallback}",
                detection.fingerprint
            ),
            None => warn!(
                "unable to identify CIC (boot code CRC 0x{:08X})",
                detection.fingerprint
            ),
        }
    }
    detection.cic.or(options.fallback)
}

/// Check an in-memory image and fix its header checksum
///
/// The image is only written to after the checksum has been calculated; on
/// error it is left untouched.
pub fn repair_image(rom_data: &mut [u8], options: &RepairOptions) -> ChecksumResult<RepairReport> {
    let detection = detect_cic(rom_data);
    debug!(
        "boot code CRC 0x{:08X} -> {}",
        detection.fingerprint,
        detection.cic.map_or("unknown", |cic| cic.name())
    );

    let Some(cic) = select_cic(&detection, options) else {
        return Err(ChecksumError::unsupported(None));
    };
    let calculated = calculate_checksum(rom_data, cic)?;
    debug!("seed 0x{:08X} for {cic}", cic.seed());

    let outcome = if options.dry_run {
        verify_checksum(rom_data, &calculated)?
    } else {
        patch_checksum(rom_data, &calculated)?
    };

    let report = RepairReport {
        detection,
        cic,
        forced: options.cic.is_some(),
        stored: outcome.stored,
        calculated,
        crc1: WordStatus::new(outcome.crc1_matches, options.dry_run),
        crc2: WordStatus::new(outcome.crc2_matches, options.dry_run),
    };

    if report.is_modified() {
        info!(
            "header checksum rewritten: 0x{:08X} 0x{:08X}",
            calculated.crc1, calculated.crc2
        );
    }

    Ok(report)
}

/// Check a ROM file and fix its header checksum
///
/// The repaired image goes to `output`, or back to `input` if none is given.
/// In place, the file is only rewritten when the header changed; nothing is
/// written in a dry run or when the checksum cannot be calculated.
pub fn repair_file(
    input: &Path,
    output: Option<&Path>,
    options: &RepairOptions,
) -> ChecksumResult<RepairReport> {
    let mut rom = fs::read(input)?;
    debug!("read {} ({} bytes)", input.display(), rom.len());

    let report = repair_image(&mut rom, options)?;

    if options.dry_run {
        return Ok(report);
    }

    match output {
        Some(path) => {
            fs::write(path, &rom)?;
            info!("wrote {}", path.display());
        }
        None if report.is_modified() => {
            fs::write(input, &rom)?;
            info!("updated {}", input.display());
        }
        None => debug!("{} unchanged", input.display()),
    }

    Ok(report)
}
