use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use shepherd_core::{ChildExit, LaunchConfig, Result, ShepherdError, SupervisorState};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

/// Handle to the spawned child process. Owned exclusively by the supervisor;
/// at most one is live per supervisor instance.
#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
    pid: Option<i32>,
}

impl ChildHandle {
    pub fn pid(&self) -> Option<i32> {
        self.pid
    }

    /// Send a termination signal to the child.
    pub fn forward_signal(&self, sig: Signal) -> Result<()> {
        let pid = self
            .pid
            .ok_or_else(|| ShepherdError::SignalError("child has no pid".to_string()))?;
        kill(Pid::from_raw(pid), sig)
            .map_err(|e| ShepherdError::SignalError(format!("kill({}, {:?}): {}", pid, sig, e)))
    }

    /// Wait for the child to terminate.
    pub async fn wait(&mut self) -> Result<ChildExit> {
        let status = self.child.wait().await?;
        Ok(ChildExit::from(status))
    }
}

/// Binds the parent's lifecycle to a single child process: spawns the
/// configured entry point, forwards termination signals, and reports the
/// child's exit status for the parent to mirror.
pub struct Supervisor {
    config: LaunchConfig,
    state: SupervisorState,
}

impl Supervisor {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            state: SupervisorState::Idle,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Spawn the configured entry point with the merged environment.
    ///
    /// Standard streams are inherited directly; nothing is buffered or
    /// intercepted. A failed OS spawn is fatal to the supervisor.
    pub fn start(&mut self) -> Result<ChildHandle> {
        self.state = SupervisorState::Spawning;

        let program = resolve_entry_point(&self.config.entry_point)?;

        let mut command = Command::new(&program);
        command
            .env_clear()
            .envs(&self.config.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.config.working_directory {
            command.current_dir(dir);
        }

        match command.spawn() {
            Ok(child) => {
                let pid = child.id().map(|p| p as i32);
                self.state = SupervisorState::Running;
                info!(
                    pid = ?pid,
                    entry = %program.display(),
                    "Child process started"
                );
                Ok(ChildHandle { child, pid })
            }
            Err(e) => {
                self.state = SupervisorState::Exited;
                error!(
                    entry = %program.display(),
                    error = %e,
                    "Failed to start child process"
                );
                Err(ShepherdError::SpawnError(format!(
                    "{}: {}",
                    program.display(),
                    e
                )))
            }
        }
    }

    /// Supervise the child until it exits and return the status to mirror.
    ///
    /// The event loop reacts to exactly two things: child exit and delivery
    /// of SIGINT/SIGTERM. A received signal is forwarded to the child and the
    /// loop keeps waiting, so the child's real termination status is the one
    /// reported.
    pub async fn run(mut self) -> Result<i32> {
        let mut handle = self.start()?;

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        loop {
            tokio::select! {
                exit = handle.wait() => {
                    let exit = exit?;
                    self.state = SupervisorState::Exited;
                    info!(exit = ?exit, code = exit.exit_code(), "Child process exited");
                    return Ok(exit.exit_code());
                }
                _ = interrupt.recv() => self.forward(&handle, Signal::SIGINT),
                _ = terminate.recv() => self.forward(&handle, Signal::SIGTERM),
            }
        }
    }

    fn forward(&mut self, handle: &ChildHandle, sig: Signal) {
        self.state = SupervisorState::Terminating;
        info!(signal = ?sig, "Received termination signal, forwarding to child");
        if let Err(e) = handle.forward_signal(sig) {
            warn!(signal = ?sig, error = %e, "Failed to forward signal");
        }
    }
}

/// Bare command names are looked up on PATH; anything with a path component
/// is used as-is and left to the OS spawn call to validate.
fn resolve_entry_point(entry: &Path) -> Result<PathBuf> {
    if entry.is_absolute() || entry.components().count() > 1 {
        return Ok(entry.to_path_buf());
    }
    which::which(entry)
        .map_err(|e| ShepherdError::SpawnError(format!("{}: {}", entry.display(), e)))
}
