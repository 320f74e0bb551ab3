//! Extraction and validation results.

use super::row::Row;

/// Coarse classification of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Describes one or more field operations
    Report,
    /// Anything else
    Talk,
}

/// Result of extracting rows from one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub rows: Vec<Row>,
    pub question: Option<String>,
    /// True iff at least one row was parsed
    pub success: bool,
}

impl ExtractionOutcome {
    pub fn new(rows: Vec<Row>, question: Option<String>) -> Self {
        let question = question.filter(|q| !q.trim().is_empty());
        let success = !rows.is_empty();
        Self {
            rows,
            question,
            success,
        }
    }

    /// Outcome for a fragment whose extraction could not be attempted.
    pub fn failed() -> Self {
        Self::new(Vec::new(), None)
    }
}

/// Verdict of the field validator over all fragments of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    /// Rows of every successful outcome, in fragment order
    pub accepted_rows: Vec<Row>,
    pub overall_success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_tracks_rows() {
        assert!(!ExtractionOutcome::new(vec![], Some("q".into())).success);
        assert!(ExtractionOutcome::new(vec![Row::new()], None).success);
    }

    #[test]
    fn test_blank_question_is_dropped() {
        let outcome = ExtractionOutcome::new(vec![], Some("   ".into()));
        assert_eq!(outcome.question, None);
    }
}
