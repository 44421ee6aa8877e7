use crate::expand::Expander;
use crate::signal::SignalDispositions;
use nix::unistd::{getpid, Pid};

/// Interpreter state that outlives a single command line.
///
/// `$?` and `$!` read from here; the executor and the job reaper write to it.
#[derive(Clone)]
pub struct Runtime {
    shell_pid: Pid,
    last_status: i32,
    last_background: Option<Pid>,
    dispositions: Option<SignalDispositions>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            shell_pid: getpid(),
            last_status: 0,
            last_background: None,
            dispositions: None,
        }
    }

    /// Runtime that hands the given saved dispositions to every child
    pub fn with_dispositions(dispositions: SignalDispositions) -> Self {
        Self {
            dispositions: Some(dispositions),
            ..Self::new()
        }
    }

    /// Status of the last foreground command (`$?`)
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: i32) {
        self.last_status = status;
    }

    /// Most recent background process (`$!`)
    pub fn last_background(&self) -> Option<Pid> {
        self.last_background
    }

    pub fn set_last_background(&mut self, pid: Pid) {
        self.last_background = Some(pid);
    }

    pub fn dispositions(&self) -> Option<&SignalDispositions> {
        self.dispositions.as_ref()
    }

    /// Expander bound to the current values of `$$`, `$?` and `$!`
    pub fn expander<'a>(&self, home: Option<&'a str>) -> Expander<'a> {
        Expander {
            shell_pid: self.shell_pid.as_raw(),
            last_status: self.last_status,
            last_background: self.last_background.map(Pid::as_raw),
            home,
        }
    }
}
