use std::fmt;
use std::io;

/// Failures that end the whole interpreter run rather than one command.
#[derive(Debug)]
pub enum ShellError {
    /// A redirection target could not be opened.
    Redirect { path: String, source: io::Error },
    /// The pipe between two pipeline stages could not be created.
    Pipe(io::Error),
    /// A pipeline stage could not be forked.
    Fork(io::Error),
    /// Standard input/output could not be saved, rebound or restored.
    Descriptor(io::Error),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Redirect { path, source } => write!(f, "{path}: {source}"),
            ShellError::Pipe(e) => write!(f, "pipe: {e}"),
            ShellError::Fork(e) => write!(f, "fork: {e}"),
            ShellError::Descriptor(e) => write!(f, "dup2: {e}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Redirect { source, .. } => Some(source),
            ShellError::Pipe(e) | ShellError::Fork(e) | ShellError::Descriptor(e) => Some(e),
        }
    }
}
