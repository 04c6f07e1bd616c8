//! Completion response parsing
//!
//! Model output follows an ad hoc two-part grammar: free-form commentary,
//! optionally followed by a revised document after a literal separator line.
//! The split happens on the first occurrence only; any later occurrence of
//! the separator is literal content of the revision body. Lossy on purpose.

/// Literal separator the model is instructed to emit before a revised version
pub const REVISION_DELIMITER: &str = "---REVISED VERSION---";

/// Result of splitting raw model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Everything before the delimiter, informational only
    pub commentary: String,

    /// Candidate document replacement, trimmed of surrounding whitespace
    pub revision: Option<String>,
}

/// Split raw model output into commentary and an optional revision.
pub fn parse(raw: &str) -> ParsedResponse {
    match raw.split_once(REVISION_DELIMITER) {
        Some((commentary, revision)) => ParsedResponse {
            commentary: commentary.to_string(),
            revision: Some(revision.trim().to_string()),
        },
        None => ParsedResponse {
            commentary: raw.to_string(),
            revision: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delimiter_is_all_commentary() {
        let parsed = parse("Looks fine to me.");
        assert_eq!(parsed.commentary, "Looks fine to me.");
        assert_eq!(parsed.revision, None);
    }

    #[test]
    fn test_delimiter_splits_commentary_and_revision() {
        let raw = "Looks fine.\n---REVISED VERSION---\nThe cat sat quietly.";
        let parsed = parse(raw);
        assert_eq!(parsed.commentary, "Looks fine.\n");
        assert_eq!(parsed.revision.as_deref(), Some("The cat sat quietly."));
    }

    #[test]
    fn test_revision_is_trimmed_commentary_is_not() {
        let raw = "  commentary  ---REVISED VERSION---   revised text \n\n";
        let parsed = parse(raw);
        assert_eq!(parsed.commentary, "  commentary  ");
        assert_eq!(parsed.revision.as_deref(), Some("revised text"));
    }

    #[test]
    fn test_round_trip_property() {
        let commentary = "Two small issues.\n";
        let revision = "A better sentence.";
        let raw = format!("{commentary}{REVISION_DELIMITER}\n{revision}\n");
        let parsed = parse(&raw);
        assert_eq!(parsed.commentary, commentary);
        assert_eq!(parsed.revision.as_deref(), Some(revision));
    }

    #[test]
    fn test_repeated_delimiter_swallowed_into_revision() {
        let raw = "before---REVISED VERSION---middle---REVISED VERSION---after";
        let parsed = parse(raw);
        assert_eq!(parsed.commentary, "before");
        // First-split policy: later delimiters are literal revision content
        assert_eq!(
            parsed.revision.as_deref(),
            Some("middle---REVISED VERSION---after")
        );
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse("");
        assert_eq!(parsed.commentary, "");
        assert_eq!(parsed.revision, None);
    }

    #[test]
    fn test_delimiter_only_yields_empty_revision() {
        let parsed = parse(REVISION_DELIMITER);
        assert_eq!(parsed.commentary, "");
        assert_eq!(parsed.revision.as_deref(), Some(""));
    }
}
