//! Transcript fragments and their reassembly.

/// The text produced for one audio segment, tagged with the segment's
/// original order index. Empty text marks a segment that failed or was
/// silent; the assembler skips it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFragment {
    pub index: usize,
    pub text: String,
}

impl TranscriptFragment {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    pub fn empty(index: usize) -> Self {
        Self::new(index, "")
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Join fragments into one transcript: index order, empty fragments
/// skipped, exactly one space between neighbors, result trimmed.
///
/// Pure and deterministic: identical input always yields the identical
/// string. All fragments empty yields `""`, which is a valid result, not
/// an error.
pub fn assemble(fragments: &[TranscriptFragment]) -> String {
    let mut ordered: Vec<&TranscriptFragment> = fragments.iter().collect();
    ordered.sort_by_key(|f| f.index);

    ordered
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_joins_with_single_space() {
        let fragments = vec![
            TranscriptFragment::new(0, "first part"),
            TranscriptFragment::new(1, "second part"),
            TranscriptFragment::new(2, "third"),
        ];
        assert_eq!(assemble(&fragments), "first part second part third");
    }

    #[test]
    fn test_assemble_skips_empty_fragments() {
        let fragments = vec![
            TranscriptFragment::new(0, "hello"),
            TranscriptFragment::empty(1),
            TranscriptFragment::new(2, "world"),
        ];
        assert_eq!(assemble(&fragments), "hello world");
    }

    #[test]
    fn test_assemble_trims_fragment_whitespace() {
        let fragments = vec![
            TranscriptFragment::new(0, "  leading  "),
            TranscriptFragment::new(1, "\ttrailing\n"),
        ];
        assert_eq!(assemble(&fragments), "leading trailing");
    }

    #[test]
    fn test_assemble_preserves_index_order() {
        let fragments = vec![
            TranscriptFragment::new(2, "three"),
            TranscriptFragment::new(0, "one"),
            TranscriptFragment::new(1, "two"),
        ];
        assert_eq!(assemble(&fragments), "one two three");
    }

    #[test]
    fn test_assemble_survives_leading_failures() {
        // The first segment failed but later ones made it: their order is
        // untouched.
        let fragments = vec![
            TranscriptFragment::empty(0),
            TranscriptFragment::new(1, "middle"),
            TranscriptFragment::new(2, "end"),
        ];
        assert_eq!(assemble(&fragments), "middle end");
    }

    #[test]
    fn test_assemble_total_failure_is_empty_string() {
        let fragments = vec![
            TranscriptFragment::empty(0),
            TranscriptFragment::empty(1),
            TranscriptFragment::empty(2),
        ];
        assert_eq!(assemble(&fragments), "");
    }

    #[test]
    fn test_assemble_no_fragments() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let fragments = vec![
            TranscriptFragment::new(0, "same"),
            TranscriptFragment::new(1, "input"),
        ];
        let first = assemble(&fragments);
        let second = assemble(&fragments);
        assert_eq!(first, second);
    }
}
