use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::fmt;
use tracing::{debug, warn};

/// How a child process changed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobChange {
    Exited(i32),
    Signaled(Signal),
    Stopped,
}

impl JobChange {
    /// Status code for `$?`: the exit code, or 128 + signal number.
    /// A stopped child has no status yet.
    pub fn status(&self) -> Option<i32> {
        match self {
            JobChange::Exited(code) => Some(*code),
            JobChange::Signaled(signal) => Some(128 + *signal as i32),
            JobChange::Stopped => None,
        }
    }
}

/// A state change of one child, as reported on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobEvent {
    pub pid: Pid,
    pub change: JobChange,
}

impl JobEvent {
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        let (pid, change) = match status {
            WaitStatus::Exited(pid, code) => (pid, JobChange::Exited(code)),
            WaitStatus::Signaled(pid, signal, _) => (pid, JobChange::Signaled(signal)),
            WaitStatus::Stopped(pid, _) => (pid, JobChange::Stopped),
            _ => return None,
        };
        Some(Self { pid, change })
    }
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.change {
            JobChange::Exited(code) => {
                write!(f, "Child process {} done. Exit status {}.", self.pid, code)
            }
            JobChange::Signaled(signal) => {
                write!(f, "Child process {} done. Signaled {}.", self.pid, signal as i32)
            }
            JobChange::Stopped => write!(f, "Child process {} stopped. Continuing.", self.pid),
        }
    }
}

/// Send SIGCONT to a stopped child
pub fn continue_job(pid: Pid) -> nix::Result<()> {
    kill(pid, Signal::SIGCONT)
}

/// Collect every child that changed state since the last call, without
/// blocking.
///
/// Stopped children are sent SIGCONT right away and keep running in the
/// background. Meant to run between commands only: it waits on any child,
/// so it must never overlap a foreground wait.
pub fn reap_background_jobs() -> Vec<JobEvent> {
    let mut events = Vec::new();

    loop {
        match waitpid(None, Some(WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => {
                let Some(event) = JobEvent::from_wait_status(status) else {
                    continue;
                };
                debug!(pid = %event.pid, change = ?event.change, "reaped background job");
                if event.change == JobChange::Stopped {
                    if let Err(e) = continue_job(event.pid) {
                        warn!("failed to continue process {}: {}", event.pid, e);
                    }
                }
                events.push(event);
            }
            Err(Errno::ECHILD) => break,
            Err(Errno::EINTR) => continue,
            Err(e) => {
                warn!("waitpid failed while reaping: {}", e);
                break;
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_passthrough() {
        assert_eq!(JobChange::Exited(0).status(), Some(0));
        assert_eq!(JobChange::Exited(7).status(), Some(7));
    }

    #[test]
    fn test_signal_status_is_offset_by_128() {
        assert_eq!(JobChange::Signaled(Signal::SIGINT).status(), Some(130));
        assert_eq!(JobChange::Signaled(Signal::SIGKILL).status(), Some(137));
        assert_eq!(JobChange::Signaled(Signal::SIGTERM).status(), Some(143));
    }

    #[test]
    fn test_stopped_has_no_status() {
        assert_eq!(JobChange::Stopped.status(), None);
    }

    #[test]
    fn test_event_from_wait_status() {
        let pid = Pid::from_raw(321);
        assert_eq!(
            JobEvent::from_wait_status(WaitStatus::Exited(pid, 3)),
            Some(JobEvent { pid, change: JobChange::Exited(3) })
        );
        assert_eq!(
            JobEvent::from_wait_status(WaitStatus::Signaled(pid, Signal::SIGTERM, false)),
            Some(JobEvent { pid, change: JobChange::Signaled(Signal::SIGTERM) })
        );
        assert_eq!(
            JobEvent::from_wait_status(WaitStatus::Stopped(pid, Signal::SIGTSTP)),
            Some(JobEvent { pid, change: JobChange::Stopped })
        );
        assert_eq!(JobEvent::from_wait_status(WaitStatus::StillAlive), None);
    }

    #[test]
    fn test_event_report_lines() {
        let pid = Pid::from_raw(55);
        let exited = JobEvent { pid, change: JobChange::Exited(0) };
        let signaled = JobEvent { pid, change: JobChange::Signaled(Signal::SIGTERM) };
        let stopped = JobEvent { pid, change: JobChange::Stopped };

        assert_eq!(exited.to_string(), "Child process 55 done. Exit status 0.");
        assert_eq!(signaled.to_string(), "Child process 55 done. Signaled 15.");
        assert_eq!(stopped.to_string(), "Child process 55 stopped. Continuing.");
    }
}
