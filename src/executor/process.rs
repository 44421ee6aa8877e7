//! Running external programs
//!
//! `fork`, then in the child: saved signal dispositions back, redirections
//! onto stdin/stdout, `execvp`. The parent either waits for that one child
//! or records it as the latest background job and returns.
//!
//! Between `fork` and `exec` the child only makes async-signal-safe calls.
//! Everything it needs (argv, file names, the pointer array for `execvp`)
//! is allocated before forking.

use crate::error::{ShellError, CHILD_FAILURE_STATUS};
use crate::jobs::{self, JobEvent};
use crate::parser::ast::ExternalCommand;
use crate::runtime::Runtime;
use crate::signal::SignalDispositions;
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::libc;
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::{dup2, fork, ForkResult, Pid};
use std::ffi::{CStr, CString};
use std::os::unix::io::RawFd;
use std::ptr;
use tracing::{debug, warn};

/// Permission bits for files created by `> FILE`, before the umask
const OUTPUT_FILE_MODE: u32 = 0o666;

/// An external command with every C string it needs already built
struct PreparedCommand {
    argv: Vec<CString>,
    // Null-terminated; points into `argv`
    argv_ptrs: Vec<*const libc::c_char>,
    input: Option<CString>,
    output: Option<CString>,
}

impl PreparedCommand {
    fn new(cmd: &ExternalCommand) -> Result<Self, ShellError> {
        let argv = cmd
            .argv
            .iter()
            .map(|arg| c_string(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(ptr::null());

        Ok(Self {
            argv,
            argv_ptrs,
            input: cmd.redirections.input.as_deref().map(c_string).transpose()?,
            output: cmd.redirections.output.as_deref().map(c_string).transpose()?,
        })
    }
}

fn c_string(s: &str) -> Result<CString, ShellError> {
    CString::new(s).map_err(|_| ShellError::NulByte(s.to_string()))
}

/// Fork and run `cmd`, updating `$?` or `$!` in `runtime`.
///
/// Foreground: blocks until the child exits, is killed, or stops. A stopped
/// child is reported, continued, and from then on tracked as the latest
/// background job. Background: returns as soon as the child exists.
pub fn run_external(cmd: &ExternalCommand, runtime: &mut Runtime) -> Result<(), ShellError> {
    let prepared = PreparedCommand::new(cmd)?;
    let dispositions = runtime.dispositions().copied();

    // SAFETY: the child branch only calls async-signal-safe functions and
    // never returns
    match unsafe { fork() } {
        Err(errno) => Err(ShellError::Fork(errno)),
        Ok(ForkResult::Child) => exec_child(&prepared, dispositions.as_ref()),
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = %child, program = cmd.program(), background = cmd.background, "forked");
            if cmd.background {
                runtime.set_last_background(child);
                Ok(())
            } else {
                wait_foreground(child, runtime)
            }
        }
    }
}

fn wait_foreground(child: Pid, runtime: &mut Runtime) -> Result<(), ShellError> {
    loop {
        let status = match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => status,
            Err(Errno::EINTR) => continue,
            Err(source) => {
                return Err(ShellError::Wait {
                    pid: child.as_raw(),
                    source,
                })
            }
        };

        let Some(event) = JobEvent::from_wait_status(status) else {
            continue;
        };
        debug!(pid = %child, change = ?event.change, "foreground job changed state");

        match event.change.status() {
            Some(code) => runtime.set_last_status(code),
            None => {
                eprintln!("{}", event);
                if let Err(e) = jobs::continue_job(child) {
                    warn!("failed to continue process {}: {}", child, e);
                }
                runtime.set_last_background(child);
            }
        }
        return Ok(());
    }
}

fn exec_child(cmd: &PreparedCommand, dispositions: Option<&SignalDispositions>) -> ! {
    if let Some(dispositions) = dispositions {
        if let Err(e) = dispositions.restore_for_child() {
            child_fail(b"signal setup", e);
        }
    }

    if let Some(path) = &cmd.input {
        redirect(path, OFlag::O_RDONLY, libc::STDIN_FILENO);
    }
    if let Some(path) = &cmd.output {
        redirect(
            path,
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            libc::STDOUT_FILENO,
        );
    }

    // SAFETY: argv_ptrs is null-terminated and points into live CStrings
    unsafe { libc::execvp(cmd.argv_ptrs[0], cmd.argv_ptrs.as_ptr()) };
    child_fail(cmd.argv[0].to_bytes(), Errno::last())
}

/// Open `path` and put it in place of `target`, or end the child
fn redirect(path: &CStr, flags: OFlag, target: RawFd) {
    let mode = Mode::from_bits_truncate(OUTPUT_FILE_MODE as _);
    let fd = match open(path, flags | OFlag::O_CLOEXEC, mode) {
        Ok(fd) => fd,
        Err(e) => child_fail(path.to_bytes(), e),
    };
    if let Err(e) = dup2(fd, target) {
        child_fail(path.to_bytes(), e);
    }
}

/// Report `subject: reason` on stderr and terminate the child
fn child_fail(subject: &[u8], err: Errno) -> ! {
    let parts: [&[u8]; 5] = [
        b"smallsh: ",
        subject,
        b": ",
        err.desc().as_bytes(),
        b"\n",
    ];
    for part in parts {
        write_stderr(part);
    }
    // SAFETY: _exit skips atexit handlers and stdio flushing that belong to
    // the parent
    unsafe { libc::_exit(CHILD_FAILURE_STATUS) }
}

fn write_stderr(bytes: &[u8]) {
    // SAFETY: plain write(2) of a valid buffer; a failed write is ignored
    unsafe {
        libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len());
    }
}
