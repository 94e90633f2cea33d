//! The player's progress: the level to start from next time.
//!
//! Binary format (little endian):
//! - u32: current level, starting at 1

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Default location of the progress file.
pub const PROGRESS_BIN: &str = "progress.bin";

/// Saves `level` as the current level.
pub fn save_level(path: impl AsRef<Path>, level: u32) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&level.to_le_bytes())?;
    file.flush()
}

/// Loads the saved level. Missing, truncated or zero-valued files read as `None`.
pub fn load_level(path: impl AsRef<Path>) -> Option<u32> {
    let mut file = File::open(path).ok()?;
    let mut u32_buffer = [0u8; 4];
    file.read_exact(&mut u32_buffer).ok()?;
    Some(u32::from_le_bytes(u32_buffer)).filter(|&level| level > 0)
}
