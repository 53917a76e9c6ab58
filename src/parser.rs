/// Characters that separate words.
const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r'];

/// Characters that always form a token of their own, even when written
/// flush against a word (`a<b` tokenizes like `a < b`).
const OPERATORS: &[char] = &['<', '>', '|'];

/// Returns true if the character is one of the single-character operators.
pub fn is_operator(ch: char) -> bool {
    OPERATORS.contains(&ch)
}

/// Tokenize a raw input line.
///
/// Every `<`, `>` and `|` becomes its own token; every other maximal run of
/// non-whitespace becomes one token. There is no quoting or escaping, so a
/// token is never re-split later. An empty or blank line yields no tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in input.chars() {
        if WHITESPACE.contains(&ch) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else if is_operator(ch) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(ch.to_string());
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_command() {
        assert_eq!(tokenize("ls -l /tmp"), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn operators_split_without_spaces() {
        assert_eq!(tokenize("a<b"), vec!["a", "<", "b"]);
        assert_eq!(tokenize("a<b"), tokenize("a < b"));
    }

    #[test]
    fn every_operator_is_isolated() {
        assert_eq!(
            tokenize("cat<in.txt|sort>out.txt"),
            vec!["cat", "<", "in.txt", "|", "sort", ">", "out.txt"]
        );
    }

    #[test]
    fn adjacent_operators_stay_separate() {
        assert_eq!(tokenize("a >> b"), vec!["a", ">", ">", "b"]);
        assert_eq!(tokenize("a||b"), vec!["a", "|", "|", "b"]);
    }

    #[test]
    fn tabs_and_newline_are_whitespace() {
        assert_eq!(tokenize("\techo\t hi \n"), vec!["echo", "hi"]);
    }

    #[test]
    fn non_ascii_space_is_part_of_a_word() {
        assert_eq!(tokenize("a\u{a0}b c"), vec!["a\u{a0}b", "c"]);
    }

    #[test]
    fn empty_and_blank_lines_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t \n").is_empty());
    }

    #[test]
    fn quotes_are_ordinary_characters() {
        assert_eq!(tokenize(r#"echo "a b""#), vec!["echo", "\"a", "b\""]);
    }
}
