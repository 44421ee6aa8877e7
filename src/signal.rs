use nix::libc;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::{debug, warn};

fn ignore_action() -> SigAction {
    SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty())
}

/// Dispositions of SIGINT and SIGTSTP as they were before the interpreter
/// started ignoring them.
///
/// The interpreter itself never stops or dies on Ctrl-C / Ctrl-Z; its
/// children get the saved dispositions back right after `fork`.
#[derive(Clone, Copy)]
pub struct SignalDispositions {
    interrupt: SigAction,
    terminal_stop: SigAction,
}

impl SignalDispositions {
    /// Ignore SIGINT and SIGTSTP in this process, remembering what they were
    pub fn install() -> nix::Result<Self> {
        let ignore = ignore_action();
        // SAFETY: SIG_IGN installs no handler code
        let terminal_stop = unsafe { sigaction(Signal::SIGTSTP, &ignore) }?;
        let interrupt = unsafe { sigaction(Signal::SIGINT, &ignore) }?;
        debug!("ignoring SIGINT and SIGTSTP");

        Ok(Self {
            interrupt,
            terminal_stop,
        })
    }

    /// Put back the saved dispositions. Called in the child between `fork`
    /// and `exec`, so it must stay async-signal-safe: no allocation, no
    /// logging.
    pub fn restore_for_child(&self) -> nix::Result<()> {
        // SAFETY: both actions were returned by sigaction(2) earlier
        unsafe {
            sigaction(Signal::SIGTSTP, &self.terminal_stop)?;
            sigaction(Signal::SIGINT, &self.interrupt)?;
        }
        Ok(())
    }
}

extern "C" fn interrupt_read(_signal: libc::c_int) {}

/// Lets SIGINT interrupt a blocking read while it is alive.
///
/// SIGINT runs an empty handler installed without `SA_RESTART`, so a read
/// blocked on the terminal fails with `EINTR` instead of killing the
/// interpreter. Dropping the guard goes back to ignoring SIGINT.
pub struct InterruptibleRead {
    _private: (),
}

impl InterruptibleRead {
    pub fn begin() -> nix::Result<Self> {
        let action = SigAction::new(
            SigHandler::Handler(interrupt_read),
            SaFlags::empty(),
            SigSet::empty(),
        );
        // SAFETY: the handler does nothing, which is trivially signal-safe
        unsafe { sigaction(Signal::SIGINT, &action) }?;
        Ok(Self { _private: () })
    }
}

impl Drop for InterruptibleRead {
    fn drop(&mut self) {
        // SAFETY: SIG_IGN installs no handler code
        if let Err(e) = unsafe { sigaction(Signal::SIGINT, &ignore_action()) } {
            warn!("failed to ignore SIGINT after read: {}", e);
        }
    }
}
