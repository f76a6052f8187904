//! Foreground child supervision.
//!
//! Spawns the application, relays its output, polls for exit, and forwards
//! interrupts so the server can close its listeners before the launcher
//! exits. The launcher's exit code is the child's.

use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use devup_core::error::BootstrapError;

use crate::tee::{spawn_relay, Fanout, SharedLog};

/// Child poll interval while relaying output.
const POLL_INTERVAL_MS: u64 = 100;

/// Set by the signal handler; checked by the wait loop.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Everything needed to start the application process.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Activation variables injected into the child (`VIRTUAL_ENV`, `PATH`).
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    /// Combined stdout+stderr capture, truncated per run.
    pub log_file: PathBuf,
    /// How long to wait after forwarding a termination signal.
    pub grace: Duration,
}

/// Run the application to completion and return its exit code.
pub fn run(spec: &LaunchSpec) -> Result<i32, BootstrapError> {
    install_signal_handler();
    INTERRUPTED.store(false, Ordering::SeqCst);

    let log = SharedLog::create(&spec.log_file).map_err(|e| {
        BootstrapError::Launch(format!(
            "cannot create log file {}: {}",
            spec.log_file.display(),
            e
        ))
    })?;

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in &spec.envs {
        cmd.env(key, value);
    }
    if let Some(ref cwd) = spec.cwd {
        cmd.current_dir(cwd);
    }

    tracing::info!(
        program = %spec.program.display(),
        args = ?spec.args,
        log = %spec.log_file.display(),
        "Launching application"
    );

    let mut child = cmd
        .spawn()
        .map_err(|e| BootstrapError::Launch(format!("{}: {}", spec.program.display(), e)))?;

    // Stream both pipes to the terminal and the shared log as chunks arrive.
    let out_relay = child
        .stdout
        .take()
        .map(|out| spawn_relay(out, Fanout { a: io::stdout(), b: log.clone() }));
    let err_relay = child
        .stderr
        .take()
        .map(|err| spawn_relay(err, Fanout { a: io::stderr(), b: log }));

    let status = wait_forwarding_signals(&mut child, spec.grace)
        .map_err(|e| BootstrapError::Launch(format!("failed to wait for child: {e}")))?;

    // Relays end at pipe EOF, shortly after child exit.
    if let Some(handle) = out_relay {
        let _ = handle.join();
    }
    if let Some(handle) = err_relay {
        let _ = handle.join();
    }

    let code = if INTERRUPTED.load(Ordering::SeqCst) {
        130
    } else {
        exit_code(&status)
    };
    tracing::info!(exit_code = code, "Application exited");
    Ok(code)
}

/// Poll the child until it exits. On interrupt: forward a termination
/// signal once, give the child the grace period, then kill it.
fn wait_forwarding_signals(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let poll = Duration::from_millis(POLL_INTERVAL_MS);
    let mut term_sent_at: Option<Instant> = None;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        if INTERRUPTED.load(Ordering::SeqCst) {
            match term_sent_at {
                None => {
                    tracing::info!("Interrupt received, forwarding termination to the application");
                    forward_term(child);
                    term_sent_at = Some(Instant::now());
                }
                Some(sent) if sent.elapsed() > grace => {
                    tracing::warn!("Application did not stop within the grace period, killing it");
                    let _ = child.kill();
                    return child.wait();
                }
                Some(_) => {}
            }
        }

        thread::sleep(poll);
    }
}

#[cfg(unix)]
fn forward_term(child: &mut Child) {
    // SAFETY: signaling our own child pid.
    unsafe {
        libc::kill(child.id() as i32, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn forward_term(child: &mut Child) {
    // No SIGTERM equivalent; a hard kill is the only forwarding available.
    let _ = child.kill();
}

fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

fn install_signal_handler() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst)) {
            tracing::warn!(error = %e, "Could not install signal handler; interrupts will not be forwarded");
        }
    });
}
