use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Added,
    Removed,
    HunkHeader,
    FileHeader,
    ModeNotice,
    BinaryNotice,
    Context,
}

impl LineKind {
    /// Pure function of the line's prefix; position in the diff never matters.
    pub fn classify(line: &str) -> Self {
        if line.starts_with("diff ") || line.starts_with("index ") {
            Self::FileHeader
        } else if line.starts_with("@@") {
            Self::HunkHeader
        } else if line.starts_with("new file mode")
            || line.starts_with("deleted file mode")
            || line.starts_with("old mode")
            || line.starts_with("new mode")
        {
            Self::ModeNotice
        } else if line.starts_with("Binary files") {
            Self::BinaryNotice
        } else if line.starts_with('+') {
            Self::Added
        } else if line.starts_with('-') {
            Self::Removed
        } else {
            Self::Context
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub text: String,
    pub kind: LineKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeChange {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument {
    pub is_binary: bool,
    pub file_path: Option<String>,
    pub mode_change: Option<ModeChange>,
    pub lines: Vec<DiffLine>,
}

impl DiffDocument {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn file_extension(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .and_then(|path| Path::new(path).extension())
            .and_then(|ext| ext.to_str())
    }

    /// Reassembles the source text; `parse(doc.to_text())` yields `doc` again.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parses `git diff`/`git show` output in one forward pass.
///
/// Only the last `diff --git` header and the last mode change survive in the
/// metadata of a multi-file diff; every line is still kept in order.
pub fn parse(raw: &str) -> DiffDocument {
    let mut document = DiffDocument::default();
    if raw.trim().is_empty() {
        return document;
    }

    for line in raw.split('\n') {
        if line.starts_with("Binary files") {
            document.is_binary = true;
        }

        if let Some(rest) = line.strip_prefix("diff --git ")
            && let Some(target) = target_path(rest)
        {
            document.file_path = Some(target.to_owned());
        }

        if let Some(old) = line.strip_prefix("old mode ") {
            document.mode_change = Some(ModeChange {
                old: old.to_owned(),
                new: String::new(),
            });
        }

        if let Some(new) = line.strip_prefix("new mode ")
            && let Some(change) = document.mode_change.as_mut()
        {
            change.new = new.to_owned();
        }

        document.lines.push(DiffLine {
            text: line.to_owned(),
            kind: LineKind::classify(line),
        });
    }

    document
}

// Matches `a/(.+) b/(.+)` with a greedy first group: the split happens at the
// last ` b/` that still leaves a non-empty path on both sides.
fn target_path(header: &str) -> Option<&str> {
    let body = header.strip_prefix("a/")?;

    let mut search_end = body.len();
    while let Some(idx) = body[..search_end].rfind(" b/") {
        let target = body[idx + 3..].trim_end_matches('\r');
        if idx > 0 && !target.is_empty() {
            return Some(target);
        }
        search_end = idx;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{LineKind, ModeChange, parse};

    const SIMPLE: &str = "diff --git a/foo.ts b/foo.ts\nindex abc..def 100644\n--- a/foo.ts\n+++ b/foo.ts\n@@ -1,2 +1,2 @@\n-old line\n+new line\n";

    #[test]
    fn parses_single_file_modification() {
        let doc = parse(SIMPLE);

        assert_eq!(doc.file_path.as_deref(), Some("foo.ts"));
        assert!(!doc.is_binary);
        assert_eq!(doc.mode_change, None);

        let kinds = doc.lines.iter().map(|line| line.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                LineKind::FileHeader,
                LineKind::FileHeader,
                LineKind::Removed,
                LineKind::Added,
                LineKind::HunkHeader,
                LineKind::Removed,
                LineKind::Added,
                LineKind::Context,
            ]
        );
        assert_eq!(doc.lines.last().map(|line| line.text.as_str()), Some(""));
    }

    #[test]
    fn round_trips_source_text_including_trailing_segments() {
        for raw in [SIMPLE, "a\n\n\nb", " context\n\n", "+x\r\n-y"] {
            assert_eq!(parse(raw).to_text(), raw);
        }
    }

    #[test]
    fn empty_and_blank_input_yield_empty_documents() {
        for raw in ["", "   ", "\n\n", "\t \n"] {
            let doc = parse(raw);
            assert!(doc.is_empty());
            assert!(!doc.is_binary);
            assert_eq!(doc.file_path, None);
            assert_eq!(doc.mode_change, None);
        }
    }

    #[test]
    fn binary_flag_is_sticky_regardless_of_position() {
        let late = "diff --git a/x.png b/x.png\nindex 1..2\nBinary files a/x.png and b/x.png differ";
        let early = "Binary files a/x.png and b/x.png differ\ndiff --git a/y b/y\n+text";

        assert!(parse(late).is_binary);
        assert!(parse(early).is_binary);
        assert!(!parse(SIMPLE).is_binary);
        assert_eq!(
            parse(late).lines[2].kind,
            LineKind::BinaryNotice
        );
    }

    #[test]
    fn mode_change_pairs_old_and_new() {
        let doc = parse("diff --git a/run.sh b/run.sh\nold mode 100644\nnew mode 100755");
        assert_eq!(
            doc.mode_change,
            Some(ModeChange {
                old: String::from("100644"),
                new: String::from("100755"),
            })
        );
    }

    #[test]
    fn new_mode_without_old_mode_is_ignored() {
        let doc = parse("diff --git a/run.sh b/run.sh\nnew mode 100755");
        assert_eq!(doc.mode_change, None);
        assert_eq!(doc.lines[1].kind, LineKind::ModeNotice);
    }

    #[test]
    fn old_mode_without_new_mode_keeps_empty_target() {
        let doc = parse("old mode 100644\n+x");
        assert_eq!(
            doc.mode_change,
            Some(ModeChange {
                old: String::from("100644"),
                new: String::new(),
            })
        );
    }

    #[test]
    fn multi_file_diff_keeps_last_metadata() {
        let raw = "diff --git a/one.rs b/one.rs\nold mode 100644\nnew mode 100755\n\
                   diff --git a/two.rs b/two.rs\nold mode 100755\n+fn main() {}";
        let doc = parse(raw);

        assert_eq!(doc.file_path.as_deref(), Some("two.rs"));
        assert_eq!(
            doc.mode_change,
            Some(ModeChange {
                old: String::from("100755"),
                new: String::new(),
            })
        );
        assert_eq!(doc.lines.len(), 6);
    }

    #[test]
    fn unmatched_header_keeps_previous_path() {
        let doc = parse("diff --git a/keep.txt b/keep.txt\ndiff --git weird header");
        assert_eq!(doc.file_path.as_deref(), Some("keep.txt"));
    }

    #[test]
    fn extracts_paths_containing_spaces_and_renames() {
        let doc = parse("diff --git a/dir with space/a.txt b/dir with space/a.txt");
        assert_eq!(doc.file_path.as_deref(), Some("dir with space/a.txt"));

        let renamed = parse("diff --git a/old/name.rs b/new/name.rs");
        assert_eq!(renamed.file_path.as_deref(), Some("new/name.rs"));
        assert_eq!(renamed.file_extension(), Some("rs"));
    }

    #[test]
    fn crlf_header_path_drops_carriage_return() {
        let raw = "diff --git a/x.rs b/x.rs\r\n+fn x() {}\r\n";
        let doc = parse(raw);

        assert_eq!(doc.file_path.as_deref(), Some("x.rs"));
        assert_eq!(doc.file_extension(), Some("rs"));
        assert_eq!(doc.lines[0].text, "diff --git a/x.rs b/x.rs\r");
        assert_eq!(doc.to_text(), raw);
    }

    #[test]
    fn file_marker_lines_follow_their_sign() {
        assert_eq!(LineKind::classify("--- a/foo.ts"), LineKind::Removed);
        assert_eq!(LineKind::classify("+++ b/foo.ts"), LineKind::Added);
        assert_eq!(LineKind::classify("--- /dev/null"), LineKind::Removed);
        assert_eq!(LineKind::classify("index abc..def 100644"), LineKind::FileHeader);
    }

    #[test]
    fn classification_ignores_position() {
        assert_eq!(LineKind::classify("new file mode 100644"), LineKind::ModeNotice);
        assert_eq!(LineKind::classify("deleted file mode 100644"), LineKind::ModeNotice);
        assert_eq!(LineKind::classify("@@ -0,0 +1 @@ fn x"), LineKind::HunkHeader);
        assert_eq!(LineKind::classify("+"), LineKind::Added);
        assert_eq!(LineKind::classify("-"), LineKind::Removed);
        assert_eq!(LineKind::classify(" unchanged"), LineKind::Context);
        assert_eq!(LineKind::classify(""), LineKind::Context);
        assert_eq!(LineKind::classify("\\ No newline at end of file"), LineKind::Context);
    }
}
