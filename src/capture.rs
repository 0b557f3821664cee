//! One mode2 capture session against the external LIRC utility.
//!
//! Spawns mode2 with a piped stdout, drains it on a dedicated reader
//! thread, and polls until the operator presses Ctrl-C or an optional
//! timeout elapses. The core pipeline never sees any of this; it only
//! receives the final capture text.

use anyhow::{bail, Context, Result};
use crossbeam_channel::{bounded, Receiver};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const EXIT_GRACE: Duration = Duration::from_secs(2);

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigint(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// Why a capture session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Operator pressed Ctrl-C; the normal way to finish a capture.
    ManualStop,
    /// The optional capture timeout elapsed first.
    Timeout,
    /// mode2 exited on its own before the operator stopped it.
    UtilityExited,
}

impl StopReason {
    pub fn label(self) -> &'static str {
        match self {
            StopReason::ManualStop => "manual_stop",
            StopReason::Timeout => "timeout",
            StopReason::UtilityExited => "utility_exited",
        }
    }
}

/// Raw capture text plus how the session ended.
#[derive(Debug)]
pub struct CaptureResult {
    pub raw: String,
    pub stop: StopReason,
}

/// A running mode2 child with its stdout reader thread.
pub struct CaptureSession {
    child: Child,
    output_rx: Receiver<Vec<u8>>,
    _reader: thread::JoinHandle<()>,
}

impl CaptureSession {
    /// Spawn `<mode2_cmd> -m -d <device>` with stdout piped to us.
    ///
    /// `mode2_cmd` may carry extra arguments (split with shell-words by
    /// the config layer before it reaches here).
    pub fn spawn(mode2_argv: &[String], device: &str) -> Result<Self> {
        let (program, extra_args) = mode2_argv
            .split_first()
            .context("mode2 command is empty")?;
        let mut child = Command::new(program)
            .args(extra_args)
            .arg("-m")
            .arg("-d")
            .arg(device)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn capture utility '{program}'"))?;

        let stdout = child
            .stdout
            .take()
            .context("capture utility has no stdout pipe")?;
        let (tx, rx) = bounded(100);
        let reader = spawn_reader_thread(stdout, tx);

        Ok(Self {
            child,
            output_rx: rx,
            _reader: reader,
        })
    }

    /// Block until Ctrl-C, timeout, or utility exit, polling every 100ms.
    ///
    /// Installs a SIGINT handler for the duration of the call so Ctrl-C
    /// stops the capture instead of the whole run; the previous handler is
    /// restored before returning.
    pub fn run(mut self, timeout: Option<Duration>) -> Result<CaptureResult> {
        INTERRUPTED.store(false, Ordering::Relaxed);
        // SAFETY: handle_sigint only stores to an atomic, which is
        // async-signal-safe. The previous disposition is restored below.
        let previous = unsafe { libc::signal(libc::SIGINT, handle_sigint as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            bail!("failed to install SIGINT handler");
        }

        let started = Instant::now();
        let mut raw = Vec::new();
        let stop = loop {
            thread::sleep(POLL_INTERVAL);
            drain_into(&self.output_rx, &mut raw);

            if INTERRUPTED.load(Ordering::Relaxed) {
                break StopReason::ManualStop;
            }
            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    break StopReason::Timeout;
                }
            }
            if let Some(status) = self.child.try_wait().context("failed to poll mode2")? {
                warn!(status = %status, "capture utility exited before the operator stopped it");
                break StopReason::UtilityExited;
            }
        };

        // SAFETY: restores the disposition saved above.
        unsafe { libc::signal(libc::SIGINT, previous) };

        self.stop_child(stop)?;
        // The reader thread sends everything it saw before EOF, so one
        // final drain after exit collects the tail of the capture.
        while let Ok(chunk) = self.output_rx.recv_timeout(Duration::from_millis(200)) {
            raw.extend(chunk);
        }

        debug!(
            bytes = raw.len(),
            stop = stop.label(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "capture session finished"
        );
        let raw = String::from_utf8(raw).context("capture utility produced non-UTF-8 output")?;
        Ok(CaptureResult { raw, stop })
    }

    /// Forward SIGINT to mode2 so it flushes and exits, escalating to a
    /// hard kill if it lingers past the grace window.
    fn stop_child(&mut self, stop: StopReason) -> Result<()> {
        if stop == StopReason::UtilityExited {
            return Ok(());
        }
        // SAFETY: child.id() is the pid of a process we own; best-effort signal.
        unsafe {
            libc::kill(self.child.id() as libc::pid_t, libc::SIGINT);
        }
        let deadline = Instant::now() + EXIT_GRACE;
        loop {
            if self.child.try_wait().context("failed to reap mode2")?.is_some() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!("capture utility ignored SIGINT, killing it");
                self.child.kill().context("failed to kill mode2")?;
                self.child.wait().context("failed to reap killed mode2")?;
                return Ok(());
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}

/// Continuously read the capture pipe and forward chunks to the session.
fn spawn_reader_thread(
    mut stdout: impl Read + Send + 'static,
    tx: crossbeam_channel::Sender<Vec<u8>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        loop {
            match stdout.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buffer[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!("capture pipe read error: {err}");
                    break;
                }
            }
        }
    })
}

fn drain_into(rx: &Receiver<Vec<u8>>, raw: &mut Vec<u8>) {
    while let Ok(chunk) = rx.try_recv() {
        raw.extend(chunk);
    }
}
