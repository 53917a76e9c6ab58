use crate::ast::Line;
use crate::error::ShellError;
use crate::executor::{self, Outcome};
use crate::expander;
use crate::parser;
use crate::pipeline;
use crate::status::Status;

/// Whether the read loop should keep going after a line.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interpreter state carried from one line to the next.
#[derive(Debug, Default)]
pub struct Shell {
    status: Status,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status left by the last executed segment.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Tokenize, expand, split and execute one input line.
    ///
    /// Per-command problems are reported and recorded in the status. Only
    /// unrecoverable errors come back as `Err`.
    pub fn run_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        let words = parser::tokenize(line);
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let words = expander::expand_words(words);
        log::debug!("words: {words:?}");
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let outcome = match pipeline::split_line(words) {
            Ok(Line::Simple(segment)) => executor::run_segment(segment, self.status)?,
            Ok(Line::Pipeline(left, right)) => executor::run_pipeline(left, right, self.status)?,
            Err(msg) => {
                eprintln!("{msg}");
                Outcome::Completed(Status::Failure)
            }
        };

        match outcome {
            Outcome::Skipped => Ok(Flow::Continue),
            Outcome::Completed(status) => {
                self.status = status;
                Ok(Flow::Continue)
            }
            Outcome::Exit => Ok(Flow::Exit),
        }
    }
}
