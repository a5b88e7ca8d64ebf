//! Common infrastructure shared by the ROM modules and the driver

mod error;

pub use error::{ChecksumError, ChecksumResult};
