use std::fmt;
use std::process::Command;

/// Signals the dashboard can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Term,
    Kill,
    /// Signal 0: existence check, nothing is delivered.
    Probe,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::Term => "SIGTERM",
            Signal::Kill => "SIGKILL",
            Signal::Probe => "signal 0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsError {
    NoSuchProcess,
    PermissionDenied,
    Unsupported,
    Other(String),
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsError::NoSuchProcess => write!(f, "no such process"),
            OsError::PermissionDenied => write!(f, "permission denied"),
            OsError::Unsupported => write!(f, "not supported on this platform"),
            OsError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

pub trait PlatformExtensions {
    fn clock_ticks_per_second() -> Option<u64>;
    fn page_size_bytes() -> Option<u64>;
    fn send_signal(pid: u32, signal: Signal) -> Result<(), OsError>;
    fn get_nice(pid: u32) -> Result<i32, OsError>;
    fn set_nice(pid: u32, nice: i32) -> Result<(), OsError>;
    /// Makes the child start its own session so it outlives the terminal.
    fn detach_on_spawn(command: &mut Command);
}

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod fallback;

#[cfg(unix)]
use unix as platform_impl;
#[cfg(not(unix))]
use fallback as platform_impl;

const DEFAULT_CLOCK_TICKS: u64 = 100;
const DEFAULT_PAGE_SIZE: u64 = 4096;

pub fn clock_ticks_per_second() -> u64 {
    platform_impl::Platform::clock_ticks_per_second().unwrap_or(DEFAULT_CLOCK_TICKS)
}

pub fn page_size_bytes() -> u64 {
    platform_impl::Platform::page_size_bytes().unwrap_or(DEFAULT_PAGE_SIZE)
}

pub fn send_signal(pid: u32, signal: Signal) -> Result<(), OsError> {
    platform_impl::Platform::send_signal(pid, signal)
}

pub fn get_nice(pid: u32) -> Result<i32, OsError> {
    platform_impl::Platform::get_nice(pid)
}

pub fn set_nice(pid: u32, nice: i32) -> Result<(), OsError> {
    platform_impl::Platform::set_nice(pid, nice)
}

pub fn detach_on_spawn(command: &mut Command) {
    platform_impl::Platform::detach_on_spawn(command)
}
