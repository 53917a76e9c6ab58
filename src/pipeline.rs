use crate::ast::{Condition, Line, Segment};
use crate::status::Status;

const PIPE: &str = "|";

/// If `word` is a gate keyword (`then` or `else`), return its
/// [`Condition`]. Returns `None` for all other words.
fn gate_word(word: &str) -> Option<Condition> {
    match word {
        "then" => Some(Condition::Then),
        "else" => Some(Condition::Else),
        _ => None,
    }
}

impl Condition {
    /// Whether a segment gated by this condition should run, given the
    /// status left by the previous segment.
    pub fn allows(self, last: Status) -> bool {
        match self {
            Condition::Always => true,
            Condition::Then => last.is_success(),
            Condition::Else => !last.is_success(),
        }
    }
}

/// Strip a leading `then`/`else` from a segment's words. Only the first
/// word is inspected.
pub fn parse_segment(mut words: Vec<String>) -> Segment {
    let condition = match words.first().and_then(|w| gate_word(w)) {
        Some(condition) => {
            words.remove(0);
            condition
        }
        None => Condition::Always,
    };
    Segment { condition, words }
}

/// Split a line's words at the first `|` token.
///
/// Only the first pipe is a split point; any later `|` stays in the right
/// segment as an ordinary word. Returns an error when either side of the
/// pipe is empty.
pub fn split_line(words: Vec<String>) -> Result<Line, String> {
    let Some(idx) = words.iter().position(|w| w == PIPE) else {
        return Ok(Line::Simple(parse_segment(words)));
    };

    let mut left = words;
    let right = left.split_off(idx + 1);
    left.pop();

    if left.is_empty() || right.is_empty() {
        return Err("mysh: syntax error near unexpected token `|'".to_string());
    }

    Ok(Line::Pipeline(parse_segment(left), parse_segment(right)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;

    fn split(input: &str) -> Line {
        split_line(tokenize(input)).expect("split_line failed")
    }

    #[test]
    fn no_pipe_is_one_segment() {
        let line = split("ls -l");
        assert_eq!(
            line,
            Line::Simple(Segment {
                condition: Condition::Always,
                words: vec!["ls".into(), "-l".into()],
            })
        );
    }

    #[test]
    fn pipe_splits_into_two_segments() {
        let Line::Pipeline(left, right) = split("ls -l | wc -l") else {
            panic!("expected a pipeline");
        };
        assert_eq!(left.words, vec!["ls", "-l"]);
        assert_eq!(right.words, vec!["wc", "-l"]);
    }

    #[test]
    fn only_first_pipe_splits() {
        let Line::Pipeline(left, right) = split("a | b | c") else {
            panic!("expected a pipeline");
        };
        assert_eq!(left.words, vec!["a"]);
        assert_eq!(right.words, vec!["b", "|", "c"]);
    }

    #[test]
    fn redirections_stay_in_their_segment() {
        let Line::Pipeline(left, right) = split("cat < in | sort > out") else {
            panic!("expected a pipeline");
        };
        assert_eq!(left.words, vec!["cat", "<", "in"]);
        assert_eq!(right.words, vec!["sort", ">", "out"]);
    }

    #[test]
    fn leading_pipe_is_error() {
        assert!(split_line(tokenize("| wc")).is_err());
    }

    #[test]
    fn trailing_pipe_is_error() {
        assert!(split_line(tokenize("ls |")).is_err());
    }

    #[test]
    fn leading_gate_word_is_stripped() {
        let segment = parse_segment(tokenize("then echo ok"));
        assert_eq!(segment.condition, Condition::Then);
        assert_eq!(segment.words, vec!["echo", "ok"]);

        let segment = parse_segment(tokenize("else echo no"));
        assert_eq!(segment.condition, Condition::Else);
        assert_eq!(segment.words, vec!["echo", "no"]);
    }

    #[test]
    fn gate_word_elsewhere_is_an_argument() {
        let segment = parse_segment(tokenize("echo then else"));
        assert_eq!(segment.condition, Condition::Always);
        assert_eq!(segment.words, vec!["echo", "then", "else"]);
    }

    #[test]
    fn only_one_gate_word_is_recognized() {
        let segment = parse_segment(tokenize("then else ls"));
        assert_eq!(segment.condition, Condition::Then);
        assert_eq!(segment.words, vec!["else", "ls"]);
    }

    #[test]
    fn each_pipeline_side_has_its_own_gate() {
        let Line::Pipeline(left, right) = split("then ls | else wc") else {
            panic!("expected a pipeline");
        };
        assert_eq!(left.condition, Condition::Then);
        assert_eq!(right.condition, Condition::Else);
    }

    #[test]
    fn conditions_follow_last_status() {
        assert!(Condition::Always.allows(Status::Success));
        assert!(Condition::Always.allows(Status::Failure));
        assert!(Condition::Then.allows(Status::Success));
        assert!(!Condition::Then.allows(Status::Failure));
        assert!(Condition::Else.allows(Status::Failure));
        assert!(!Condition::Else.allows(Status::Success));
    }
}
