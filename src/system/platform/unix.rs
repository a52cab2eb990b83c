use std::os::unix::process::CommandExt;
use std::process::Command;

use super::{OsError, PlatformExtensions, Signal};

pub struct Platform;

fn os_error(err: std::io::Error) -> OsError {
    match err.raw_os_error() {
        Some(libc::ESRCH) => OsError::NoSuchProcess,
        Some(libc::EPERM) | Some(libc::EACCES) => OsError::PermissionDenied,
        _ => OsError::Other(err.to_string()),
    }
}

#[cfg(target_os = "linux")]
fn clear_errno() {
    unsafe { *libc::__errno_location() = 0 };
}

#[cfg(target_os = "macos")]
fn clear_errno() {
    unsafe { *libc::__error() = 0 };
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn clear_errno() {}

impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> Option<u64> {
        // SAFETY: sysconf has no preconditions and only reads a constant.
        let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        (hz > 0).then_some(hz as u64)
    }

    fn page_size_bytes() -> Option<u64> {
        // SAFETY: as above.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        (size > 0).then_some(size as u64)
    }

    fn send_signal(pid: u32, signal: Signal) -> Result<(), OsError> {
        let sig = match signal {
            Signal::Term => libc::SIGTERM,
            Signal::Kill => libc::SIGKILL,
            Signal::Probe => 0,
        };
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| OsError::Other(format!("PID {pid} out of range")))?;
        let rc = unsafe { libc::kill(pid, sig) };
        if rc == 0 { Ok(()) } else { Err(os_error(std::io::Error::last_os_error())) }
    }

    fn get_nice(pid: u32) -> Result<i32, OsError> {
        // getpriority returns -1 on error, but -1 is also a valid nice value.
        // Clear errno first and check it afterwards.
        clear_errno();
        let nice = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        if nice == -1 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error().is_some_and(|code| code != 0) {
                return Err(os_error(err));
            }
        }
        Ok(nice)
    }

    fn set_nice(pid: u32, nice: i32) -> Result<(), OsError> {
        let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, pid as libc::id_t, nice) };
        if rc == 0 { Ok(()) } else { Err(os_error(std::io::Error::last_os_error())) }
    }

    fn detach_on_spawn(command: &mut Command) {
        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            command.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }
}
