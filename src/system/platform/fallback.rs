use std::process::Command;

use super::{OsError, PlatformExtensions, Signal};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> Option<u64> {
        None
    }

    fn page_size_bytes() -> Option<u64> {
        None
    }

    fn send_signal(_pid: u32, _signal: Signal) -> Result<(), OsError> {
        Err(OsError::Unsupported)
    }

    fn get_nice(_pid: u32) -> Result<i32, OsError> {
        Err(OsError::Unsupported)
    }

    fn set_nice(_pid: u32, _nice: i32) -> Result<(), OsError> {
        Err(OsError::Unsupported)
    }

    fn detach_on_spawn(_command: &mut Command) {}
}
