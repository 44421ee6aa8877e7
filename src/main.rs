#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use smallsh::config::{self, ShellConfig};
use smallsh::error::ExitSignal;
use smallsh::executor::Executor;
use smallsh::input::{LineReader, ReadOutcome};
use smallsh::jobs;
use smallsh::runtime::Runtime;
use smallsh::signal::{InterruptibleRead, SignalDispositions};
use std::io;
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const EXIT_NOTICE: &str = "\nexit\n";

fn main() {
    init_logging();

    let config = ShellConfig::from_env();
    debug!(?config, "starting smallsh");

    match run(config) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("smallsh: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

/// The interpreter loop. Returns the code to exit with.
fn run(config: ShellConfig) -> Result<i32> {
    let dispositions = SignalDispositions::install()?;
    let prompt = config.prompt.clone();
    let mut executor = Executor::with_runtime(config, Runtime::with_dispositions(dispositions));
    let mut reader = LineReader::new(io::stdin());

    loop {
        for event in jobs::reap_background_jobs() {
            eprintln!("{}", event);
        }

        eprint!("{}", prompt);

        // Ctrl-C may abort the read, but nothing else
        let outcome = {
            let _interruptible = InterruptibleRead::begin()?;
            reader.read_line()?
        };

        let line = match outcome {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => {
                eprintln!();
                continue;
            }
            ReadOutcome::Eof => {
                eprint!("{}", EXIT_NOTICE);
                return Ok(executor.runtime().last_status());
            }
        };

        if let Err(err) = executor.execute_line(&line) {
            if let Some(exit) = err.downcast_ref::<ExitSignal>() {
                return Ok(leave(exit));
            }
            return Err(err);
        }
    }
}

/// Handle the `exit` builtin: notify, interrupt the process group, and
/// hand back the exit code. The interpreter ignores SIGINT itself.
fn leave(exit: &ExitSignal) -> i32 {
    eprint!("{}", EXIT_NOTICE);
    if let Err(e) = kill(Pid::from_raw(0), Signal::SIGINT) {
        warn!("failed to interrupt process group: {}", e);
    }
    exit.exit_code
}
