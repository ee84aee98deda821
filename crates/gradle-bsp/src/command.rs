//! Process execution seam for driving the `gradle`/`gradlew` CLI: a timeout,
//! a bounded output cap, and a cooperative cancellation token layered
//! directly on top of `std::process::Command` plus a watcher thread.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Cooperative cancellation signal shared between the aggregator and every
/// probe process it spawns (§5, "Cancellation").
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Captured output from a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    /// Indicates stdout/stderr were truncated due to bounded output capture.
    pub truncated: bool,
}

impl CommandOutput {
    /// `stdout` + `stderr` concatenated with a newline separator when needed.
    pub fn combined(&self) -> String {
        let mut s = String::new();
        s.push_str(&self.stdout);
        if !self.stderr.is_empty() {
            if !s.is_empty() && !s.ends_with('\n') {
                s.push('\n');
            }
            s.push_str(&self.stderr);
        }
        s
    }
}

/// Seam allowing probe/aggregator code to run under a test double instead
/// of a real `gradle` process (§13).
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> std::io::Result<CommandOutput>;
}

#[derive(Debug, Clone)]
pub struct DefaultCommandRunner {
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
    pub max_bytes: usize,
}

impl Default for DefaultCommandRunner {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(15 * 60)),
            cancellation: None,
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> std::io::Result<CommandOutput> {
        let command_str = format_command(program, args);

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout_buf = spawn_capture_thread(child.stdout.take(), self.max_bytes);
        let stderr_buf = spawn_capture_thread(child.stderr.take(), self.max_bytes);

        let outcome = wait_with_timeout_and_cancellation(
            &mut child,
            self.timeout,
            self.cancellation.as_ref(),
        )?;

        let (stdout, stdout_truncated) = stdout_buf.join().unwrap_or_default();
        let (stderr, stderr_truncated) = stderr_buf.join().unwrap_or_default();
        let truncated = stdout_truncated || stderr_truncated;

        match outcome {
            WaitOutcome::Exited(status) => Ok(CommandOutput {
                status,
                stdout,
                stderr,
                truncated,
            }),
            WaitOutcome::TimedOut => {
                let _ = child.kill();
                let _ = child.wait();
                let mut msg = match self.timeout {
                    Some(t) => format!("command `{command_str}` timed out after {t:?}"),
                    None => format!("command `{command_str}` timed out"),
                };
                append_captured_output(&mut msg, &stdout, &stderr, truncated);
                Err(std::io::Error::new(std::io::ErrorKind::TimedOut, msg))
            }
            WaitOutcome::Cancelled => {
                let _ = child.kill();
                let _ = child.wait();
                let mut msg = format!("command `{command_str}` cancelled");
                append_captured_output(&mut msg, &stdout, &stderr, truncated);
                Err(std::io::Error::new(std::io::ErrorKind::Interrupted, msg))
            }
        }
    }
}

fn append_captured_output(msg: &mut String, stdout: &str, stderr: &str, truncated: bool) {
    if truncated {
        msg.push_str("\n(output truncated)");
    }
    if !stdout.is_empty() {
        msg.push_str("\nstdout:\n");
        msg.push_str(stdout);
    }
    if !stderr.is_empty() {
        msg.push_str("\nstderr:\n");
        msg.push_str(stderr);
    }
}

enum WaitOutcome {
    Exited(ExitStatus),
    TimedOut,
    Cancelled,
}

fn wait_with_timeout_and_cancellation(
    child: &mut Child,
    timeout: Option<Duration>,
    cancellation: Option<&CancellationToken>,
) -> std::io::Result<WaitOutcome> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(WaitOutcome::Exited(status));
        }
        if let Some(timeout) = timeout {
            if started.elapsed() >= timeout {
                return Ok(WaitOutcome::TimedOut);
            }
        }
        if let Some(token) = cancellation {
            if token.is_cancelled() {
                return Ok(WaitOutcome::Cancelled);
            }
        }
        thread::sleep(Duration::from_millis(20));
    }
}

type CaptureResult = (String, bool);

fn spawn_capture_thread<R>(stream: Option<R>, max_bytes: usize) -> thread::JoinHandle<CaptureResult>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let Some(mut stream) = stream else {
            return (String::new(), false);
        };
        let buf = Arc::new(Mutex::new(Vec::new()));
        let mut truncated = false;
        let mut chunk = [0u8; 8192];
        loop {
            let Ok(mut guard) = buf.lock() else { break };
            if guard.len() >= max_bytes {
                truncated = true;
                drop(guard);
                // Drain without buffering further so the child doesn't block on a full pipe.
                let mut sink = [0u8; 8192];
                match stream.read(&mut sink) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
            drop(guard);
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    let mut guard = buf.lock().expect("capture buffer lock poisoned");
                    guard.extend_from_slice(&chunk[..n]);
                }
                Err(_) => break,
            }
        }
        let bytes = Arc::try_unwrap(buf)
            .map(|m| m.into_inner().expect("capture buffer lock poisoned"))
            .unwrap_or_default();
        (String::from_utf8_lossy(&bytes).into_owned(), truncated)
    })
}

pub(crate) fn format_command(program: &Path, args: &[String]) -> String {
    let mut out = format_command_part(&program.to_string_lossy());
    for arg in args {
        out.push(' ');
        out.push_str(&format_command_part(arg));
    }
    out
}

fn format_command_part(part: &str) -> String {
    if part.contains(' ') || part.contains('\t') {
        format!("\"{}\"", part.replace('"', "\\\""))
    } else {
        part.to_string()
    }
}
