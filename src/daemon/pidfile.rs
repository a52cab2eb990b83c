use std::path::{Path, PathBuf};

use color_eyre::Result;

use crate::system::control::MAX_PID;

pub fn default_path() -> PathBuf {
    std::env::temp_dir().join("sentinel").join("daemon.pid")
}

pub fn write(path: &Path, pid: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, pid.to_string())?;
    Ok(())
}

/// Pid recorded in `path`, if the file exists and holds a valid pid.
pub fn read(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()?
        .trim()
        .parse()
        .ok()
        .filter(|&pid| pid > 0 && pid <= MAX_PID)
}

pub fn remove(path: &Path) {
    let _ = std::fs::remove_file(path);
}
