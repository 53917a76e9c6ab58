/// The single Success/Failure flag left by the last executed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Success,
    Failure,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Process exit code for this status (0 or 1).
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Failure => 1,
        }
    }
}

/// Decode a raw `waitpid` status into shell-style exit code semantics.
///
/// Processes terminated by signal map to `128 + signal`.
#[cfg(unix)]
pub fn exit_code_from_wait_status(raw_status: libc::c_int) -> Option<i32> {
    if libc::WIFEXITED(raw_status) {
        return Some(libc::WEXITSTATUS(raw_status));
    }

    if libc::WIFSIGNALED(raw_status) {
        let signal = libc::WTERMSIG(raw_status);
        return Some(128 + signal);
    }

    None
}
