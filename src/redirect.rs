use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

use crate::error::ShellError;
use crate::process;

/// Permission bits for files created by `>`.
const OUTPUT_MODE: u32 = 0o640;

/// The files a segment's stdin and stdout should be bound to.
///
/// At most one of each; a repeated operator replaces the earlier target.
#[derive(Debug, Default, PartialEq)]
pub struct Redirections {
    pub input: Option<String>,
    pub output: Option<String>,
}

/// Separate redirect operators from regular arguments.
/// Returns (args, redirections) or an error message for syntax errors.
///
/// Operators may appear anywhere and more than once. Each operator and the
/// word right after it are removed; every other word keeps its position.
pub fn extract_redirections(tokens: &[String]) -> Result<(Vec<String>, Redirections), String> {
    let mut args = Vec::new();
    let mut redirections = Redirections::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token == "<" {
            i += 1;
            redirections.input = Some(expect_filename(i, tokens, "<")?);
        } else if token == ">" {
            i += 1;
            redirections.output = Some(expect_filename(i, tokens, ">")?);
        } else {
            args.push(token.clone());
        }

        i += 1;
    }

    Ok((args, redirections))
}

fn expect_filename(i: usize, tokens: &[String], operator: &str) -> Result<String, String> {
    if i < tokens.len() {
        Ok(tokens[i].clone())
    } else {
        Err(format!("mysh: syntax error: expected filename after '{operator}'"))
    }
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }

    /// Open both targets and bind them onto this process's stdin/stdout.
    ///
    /// The opened files are closed once duplicated. Callers that must get
    /// their original streams back hold a [`StdioGuard`] around this call.
    pub fn apply(&self) -> Result<(), ShellError> {
        if self.is_empty() {
            return Ok(());
        }

        if let Some(path) = &self.input {
            let file = open_input(path)?;
            log::debug!("stdin <- {path}");
            process::redirect_fd(file.as_raw_fd(), libc::STDIN_FILENO)
                .map_err(ShellError::Descriptor)?;
        }

        if let Some(path) = &self.output {
            let file = open_output(path)?;
            log::debug!("stdout -> {path}");
            let _ = io::stdout().flush();
            process::redirect_fd(file.as_raw_fd(), libc::STDOUT_FILENO)
                .map_err(ShellError::Descriptor)?;
        }

        Ok(())
    }
}

fn open_input(path: &str) -> Result<File, ShellError> {
    File::open(path).map_err(|source| ShellError::Redirect {
        path: path.to_string(),
        source,
    })
}

fn open_output(path: &str) -> Result<File, ShellError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_MODE)
        .open(path)
        .map_err(|source| ShellError::Redirect {
            path: path.to_string(),
            source,
        })
}

/// RAII guard: saves stdin and stdout on construction and puts them back on
/// drop, so one segment's redirection never leaks into the next.
pub struct StdioGuard {
    saved_stdin: RawFd,
    saved_stdout: RawFd,
}

impl StdioGuard {
    pub fn save() -> io::Result<Self> {
        let saved_stdin = process::duplicate_fd(libc::STDIN_FILENO)?;
        let saved_stdout = match process::duplicate_fd(libc::STDOUT_FILENO) {
            Ok(fd) => fd,
            Err(e) => {
                process::close_fd(saved_stdin);
                return Err(e);
            }
        };
        Ok(Self {
            saved_stdin,
            saved_stdout,
        })
    }
}

impl Drop for StdioGuard {
    fn drop(&mut self) {
        let _ = io::stdout().flush();
        for (saved, target) in [
            (self.saved_stdin, libc::STDIN_FILENO),
            (self.saved_stdout, libc::STDOUT_FILENO),
        ] {
            if let Err(e) = process::redirect_fd(saved, target) {
                eprintln!("mysh: cannot restore fd {target}: {e}");
            }
            process::close_fd(saved);
        }
    }
}
