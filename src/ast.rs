/// Controls whether a segment runs based on the previous exit status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// No leading gate word; always run.
    Always,
    /// `then` — run only if the previous command succeeded.
    Then,
    /// `else` — run only if the previous command failed.
    Else,
}

/// One command's worth of words after pipeline splitting.
///
/// The leading `then`/`else`, if any, has already been stripped into
/// `condition`. Redirection operators are still embedded in `words`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub condition: Condition,
    pub words: Vec<String>,
}

/// The shape of one input line: a single segment or a two-stage pipe.
#[derive(Debug, PartialEq)]
pub enum Line {
    Simple(Segment),
    Pipeline(Segment, Segment),
}
