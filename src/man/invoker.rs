//! Running the external lookup tool.
//!
//! Everything above this module talks to the tool through [`ToolInvoker`],
//! so tests can script its answers without a manual installation.

use log::debug;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::error::InvokeError;

/// Exit status and captured standard output of one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl ToolOutput {
    pub fn new(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to run the lookup tool with the given arguments.
pub trait ToolInvoker {
    fn run(&self, args: &[String], timeout: Duration) -> Result<ToolOutput, InvokeError>;
}

impl<T: ToolInvoker + ?Sized> ToolInvoker for &T {
    fn run(&self, args: &[String], timeout: Duration) -> Result<ToolOutput, InvokeError> {
        (**self).run(args, timeout)
    }
}

impl<T: ToolInvoker + ?Sized> ToolInvoker for Box<T> {
    fn run(&self, args: &[String], timeout: Duration) -> Result<ToolOutput, InvokeError> {
        (**self).run(args, timeout)
    }
}

/// Runs the tool as a child process, killing it once the timeout expires.
#[derive(Debug, Clone)]
pub struct SubprocessInvoker {
    program: String,
    poll_interval: Duration,
}

impl SubprocessInvoker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            poll_interval: Duration::from_millis(10),
        }
    }

    fn wait_with_deadline(&self, child: &mut Child, timeout: Duration) -> Result<Option<i32>, InvokeError> {
        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait().map_err(InvokeError::Io)? {
                Some(status) => return Ok(status.code()),
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(InvokeError::Timeout(timeout));
                }
                None => thread::sleep(self.poll_interval),
            }
        }
    }
}

impl ToolInvoker for SubprocessInvoker {
    fn run(&self, args: &[String], timeout: Duration) -> Result<ToolOutput, InvokeError> {
        let started = Instant::now();
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(InvokeError::Spawn)?;

        // Drain stdout on a separate thread so a chatty child never blocks
        // on a full pipe while we poll for its exit.
        let (tx, rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let result = stdout.read_to_end(&mut buf).map(|_| buf);
                let _ = tx.send(result);
            });
        } else {
            let _ = tx.send(Ok(Vec::new()));
        }

        let code = self.wait_with_deadline(&mut child, timeout)?;

        let remaining = timeout.saturating_sub(started.elapsed()).max(self.poll_interval);
        let bytes = match rx.recv_timeout(remaining) {
            Ok(result) => result.map_err(InvokeError::Io)?,
            Err(_) => return Err(InvokeError::Timeout(timeout)),
        };

        debug!(
            "{} {} -> {:?} ({} bytes, {:?})",
            self.program,
            args.join(" "),
            code,
            bytes.len(),
            started.elapsed()
        );

        Ok(ToolOutput {
            code,
            stdout: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
