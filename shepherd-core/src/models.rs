use serde::{Deserialize, Serialize};

/// Lifecycle of a supervisor instance.
///
/// Transitions are linear; there is no retry or restart. A spawn failure
/// moves `Spawning` directly to `Exited`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Spawning,
    Running,
    Terminating,
    Exited,
}

impl SupervisorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SupervisorState::Exited)
    }
}

/// How the child process terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChildExit {
    /// Normal exit with the reported status code.
    Code(i32),
    /// Killed by a signal before it could exit.
    Signaled(i32),
}

impl ChildExit {
    /// The status the supervisor mirrors to its parent. Signal deaths map to
    /// the shell convention of 128 plus the signal number.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChildExit::Code(code) => *code,
            ChildExit::Signaled(signo) => 128 + signo,
        }
    }
}

#[cfg(unix)]
impl From<std::process::ExitStatus> for ChildExit {
    fn from(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match status.code() {
            Some(code) => ChildExit::Code(code),
            None => ChildExit::Signaled(status.signal().unwrap_or(0)),
        }
    }
}
