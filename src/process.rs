use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::os::fd::RawFd;

/// Which side of a fork the caller is on.
pub(crate) enum Fork {
    Child,
    Parent(libc::pid_t),
}

/// Fork the interpreter. Buffered stdout is flushed first so the child
/// never replays output the parent already produced.
pub(crate) fn fork() -> io::Result<Fork> {
    let _ = io::stdout().flush();

    match unsafe { libc::fork() } {
        -1 => Err(io::Error::last_os_error()),
        0 => Ok(Fork::Child),
        pid => Ok(Fork::Parent(pid)),
    }
}

/// Block until `pid` terminates and return its raw wait status.
pub(crate) fn wait_for_pid(pid: libc::pid_t) -> io::Result<libc::c_int> {
    let mut raw_status: libc::c_int = 0;

    loop {
        let rc = unsafe { libc::waitpid(pid, &mut raw_status, 0) };
        if rc >= 0 {
            return Ok(raw_status);
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err);
    }
}

/// Terminate a forked child without running the parent's exit handlers.
pub(crate) fn exit_child(code: i32) -> ! {
    let _ = io::stdout().flush();
    unsafe { libc::_exit(code) }
}

/// Restore default dispositions the interpreter overrides for itself.
/// Called in a child before it runs a segment.
pub(crate) fn reset_child_signals() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        libc::signal(libc::SIGINT, libc::SIG_DFL);
    }
}

/// Duplicate `fd` onto a fresh close-on-exec descriptor above stdio.
pub(crate) fn duplicate_fd(fd: RawFd) -> io::Result<RawFd> {
    loop {
        let rc = unsafe { libc::fcntl(fd, libc::F_DUPFD_CLOEXEC, 3) };
        if rc >= 0 {
            return Ok(rc);
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err);
    }
}

/// Make `target` refer to the same open file as `source`.
pub(crate) fn redirect_fd(source: RawFd, target: RawFd) -> io::Result<()> {
    loop {
        let rc = unsafe { libc::dup2(source, target) };
        if rc >= 0 {
            return Ok(());
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err);
    }
}

pub(crate) fn close_fd(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}

/// An executable path and argument vector converted for `execv`.
///
/// Built before forking so the child only has to make the call. The
/// pointer vector is null-terminated and points into `args`, which owns
/// the strings for as long as the `Program` lives.
pub(crate) struct Program {
    path: CString,
    args: Vec<CString>,
    argv: Vec<*const libc::c_char>,
}

impl Program {
    pub(crate) fn new(path: &str, args: &[String]) -> io::Result<Self> {
        let path = to_cstring(path)?;
        let args = args
            .iter()
            .map(|arg| to_cstring(arg))
            .collect::<io::Result<Vec<_>>>()?;

        let mut argv: Vec<*const libc::c_char> = args.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(std::ptr::null());

        Ok(Self { path, args, argv })
    }

    pub(crate) fn path(&self) -> &CStr {
        &self.path
    }

    pub(crate) fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Replace the current process image. Only returns on failure.
    pub(crate) fn exec(&self) -> io::Error {
        unsafe {
            libc::execv(self.path.as_ptr(), self.argv.as_ptr());
        }
        io::Error::last_os_error()
    }
}

fn to_cstring(s: &str) -> io::Result<CString> {
    CString::new(s).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("argument contains a NUL byte: {s:?}"),
        )
    })
}
