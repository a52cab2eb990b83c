use super::platform::{self, OsError};

pub use super::platform::Signal;

pub const NICE_MIN: i32 = -20;
pub const NICE_MAX: i32 = 19;

/// Largest pid the OS can hand out; anything above it wraps to a negative
/// `pid_t`, which `kill` reads as a process group or "every process".
pub const MAX_PID: u32 = i32::MAX as u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlResult {
    Success(u32, String),
    Failed(u32, String),
    NotFound(u32),
    Invalid(String),
}

impl ControlResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ControlResult::Success(..))
    }

    /// Text shown to the user in the status bar.
    pub fn message(&self) -> String {
        match self {
            ControlResult::Success(_, msg) | ControlResult::Failed(_, msg) => msg.clone(),
            ControlResult::NotFound(pid) => format!("PID {pid} not found"),
            ControlResult::Invalid(msg) => msg.clone(),
        }
    }
}

fn check_pid(pid: u32) -> Result<(), ControlResult> {
    if pid == 0 || pid > MAX_PID {
        return Err(ControlResult::Invalid(format!("invalid PID: {pid}")));
    }
    Ok(())
}

fn failure(pid: u32, action: String, err: OsError) -> ControlResult {
    match err {
        OsError::NoSuchProcess => ControlResult::NotFound(pid),
        err => ControlResult::Failed(pid, format!("Failed to {action}: {err}")),
    }
}

pub fn send_signal(pid: u32, signal: Signal) -> ControlResult {
    if let Err(invalid) = check_pid(pid) {
        return invalid;
    }
    match platform::send_signal(pid, signal) {
        Ok(()) => ControlResult::Success(pid, format!("Sent {} to PID {pid}", signal.name())),
        Err(err) => failure(pid, format!("send {} to PID {pid}", signal.name()), err),
    }
}

pub fn get_nice(pid: u32) -> Result<i32, ControlResult> {
    check_pid(pid)?;
    platform::get_nice(pid).map_err(|err| failure(pid, format!("read nice of PID {pid}"), err))
}

pub fn set_nice(pid: u32, nice: i32) -> ControlResult {
    if let Err(invalid) = check_pid(pid) {
        return invalid;
    }
    if !(NICE_MIN..=NICE_MAX).contains(&nice) {
        return ControlResult::Invalid(format!(
            "nice value must be between {NICE_MIN} and {NICE_MAX}, got {nice}"
        ));
    }
    match platform::set_nice(pid, nice) {
        Ok(()) => ControlResult::Success(pid, format!("Changed nice of PID {pid} to {nice}")),
        Err(err) => failure(pid, format!("set priority for PID {pid}"), err),
    }
}

/// Shifts the nice value of `pid` by `delta`, clamped to the valid range.
pub fn renice(pid: u32, delta: i32) -> ControlResult {
    match get_nice(pid) {
        Ok(current) => set_nice(pid, (current + delta).clamp(NICE_MIN, NICE_MAX)),
        Err(result) => result,
    }
}

/// True if a process with this pid exists, even one we may not signal.
pub fn process_exists(pid: u32) -> bool {
    if check_pid(pid).is_err() {
        return false;
    }
    matches!(
        platform::send_signal(pid, Signal::Probe),
        Ok(()) | Err(OsError::PermissionDenied)
    )
}
