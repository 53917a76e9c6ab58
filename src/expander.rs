use std::path::Path;

/// The wildcard marker recognized in the final path component of a token.
const MARKER: char = '*';

/// A token whose final path component holds exactly one `*`.
///
/// Matching is a two-sided literal comparison: a name matches when it starts
/// with `prefix`, ends with `suffix`, and is long enough that the two never
/// overlap.
#[derive(Debug, PartialEq)]
pub struct Wildcard<'a> {
    /// Everything up to and including the last `/`, re-attached to matches.
    dir_prefix: &'a str,
    prefix: &'a str,
    suffix: &'a str,
}

impl<'a> Wildcard<'a> {
    /// Recognize a wildcard token. Returns `None` for tokens whose final
    /// component has zero or several markers.
    pub fn parse(token: &'a str) -> Option<Self> {
        let (dir_prefix, name) = match token.rfind('/') {
            Some(idx) => token.split_at(idx + 1),
            None => ("", token),
        };

        if name.matches(MARKER).count() != 1 {
            return None;
        }

        let (prefix, suffix) = name.split_once(MARKER)?;
        Some(Self {
            dir_prefix,
            prefix,
            suffix,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(self.prefix)
            && name.ends_with(self.suffix)
    }

    fn directory(&self) -> &Path {
        if self.dir_prefix.is_empty() {
            Path::new(".")
        } else {
            Path::new(self.dir_prefix)
        }
    }

    /// List the target directory and return every matching regular,
    /// non-hidden file in listing order, with the directory prefix restored.
    /// An unreadable directory yields no matches.
    pub fn expand(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(self.directory()) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cannot list {}: {e}", self.directory().display());
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.') && self.matches(name))
            .map(|name| format!("{}{name}", self.dir_prefix))
            .collect()
    }
}

/// Expand every wildcard token in place. Ordinary tokens pass through
/// unchanged; a wildcard with no matches disappears entirely.
pub fn expand_words(words: Vec<String>) -> Vec<String> {
    let mut result = Vec::with_capacity(words.len());
    for word in words {
        match Wildcard::parse(&word) {
            Some(wildcard) => result.extend(wildcard.expand()),
            None => result.push(word),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Scratch directory removed on drop.
    struct TempDir(PathBuf);

    impl TempDir {
        fn new(label: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "mysh_expander_{label}_{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            TempDir(dir)
        }

        fn touch(&self, name: &str) {
            std::fs::write(self.0.join(name), "").unwrap();
        }

        fn prefix(&self) -> String {
            format!("{}/", self.0.display())
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn parse_splits_at_marker() {
        let w = Wildcard::parse("src/foo*.rs").unwrap();
        assert_eq!(w.dir_prefix, "src/");
        assert_eq!(w.prefix, "foo");
        assert_eq!(w.suffix, ".rs");
    }

    #[test]
    fn plain_token_is_not_wildcard() {
        assert!(Wildcard::parse("foo.txt").is_none());
    }

    #[test]
    fn two_markers_are_not_wildcard() {
        assert!(Wildcard::parse("*foo*").is_none());
    }

    #[test]
    fn marker_only_counts_in_final_component() {
        assert!(Wildcard::parse("a*b/c").is_none());
        let w = Wildcard::parse("a*b/c*").unwrap();
        assert_eq!(w.dir_prefix, "a*b/");
    }

    #[test]
    fn prefix_and_suffix_must_not_overlap() {
        let w = Wildcard::parse("ab*ba").unwrap();
        assert!(w.matches("abba"));
        assert!(w.matches("ab-ba"));
        assert!(!w.matches("aba"));
    }

    #[test]
    fn bare_marker_matches_anything() {
        let w = Wildcard::parse("*").unwrap();
        assert!(w.matches("x"));
        assert!(w.matches(""));
    }

    #[test]
    fn expands_matching_regular_files() {
        let dir = TempDir::new("matching");
        dir.touch("foo.txt");
        dir.touch("bar.txt");
        dir.touch("foo.log");

        let pattern = format!("{}foo*", dir.prefix());
        let result = sorted(expand_words(vec!["ls".into(), pattern]));
        assert_eq!(
            result,
            sorted(vec![
                "ls".to_string(),
                format!("{}foo.log", dir.prefix()),
                format!("{}foo.txt", dir.prefix()),
            ])
        );
    }

    #[test]
    fn matches_follow_directory_listing_order() {
        let dir = TempDir::new("order");
        for name in ["m_3", "m_1", "z_0", "m_2", "m_5", "m_4"] {
            dir.touch(name);
        }

        let listed: Vec<String> = std::fs::read_dir(&dir.0)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.starts_with("m_"))
            .map(|name| format!("{}{name}", dir.prefix()))
            .collect();

        let pattern = format!("{}m_*", dir.prefix());
        assert_eq!(expand_words(vec![pattern]), listed);
    }

    #[test]
    fn unmatched_wildcard_disappears() {
        let dir = TempDir::new("unmatched");
        dir.touch("foo.txt");

        let pattern = format!("{}baz*", dir.prefix());
        assert_eq!(expand_words(vec!["ls".into(), pattern]), vec!["ls"]);
    }

    #[test]
    fn hidden_files_and_directories_are_skipped() {
        let dir = TempDir::new("skipped");
        dir.touch(".foo_hidden");
        dir.touch("foo_visible");
        std::fs::create_dir(dir.0.join("foo_dir")).unwrap();

        let pattern = format!("{}*", dir.prefix());
        assert_eq!(
            expand_words(vec![pattern]),
            vec![format!("{}foo_visible", dir.prefix())]
        );
    }

    #[test]
    fn missing_directory_expands_to_nothing() {
        let words = vec!["/definitely/not/a/real/dir/*.txt".to_string()];
        assert!(expand_words(words).is_empty());
    }

    #[test]
    fn expansion_keeps_position() {
        let dir = TempDir::new("position");
        dir.touch("only.rs");

        let pattern = format!("{}*.rs", dir.prefix());
        assert_eq!(
            expand_words(vec!["wc".into(), pattern, "-l".into()]),
            vec![
                "wc".to_string(),
                format!("{}only.rs", dir.prefix()),
                "-l".to_string()
            ]
        );
    }
}
