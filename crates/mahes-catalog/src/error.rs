//! Error types for the mahes-catalog crate.
//!
//! Load-time errors mean the content file is malformed and the catalog is
//! refused as a whole. Lookup errors mean a caller asked for an id the
//! catalog does not contain, which is a content-integrity defect.

use mahes_types::{OptionId, QuestionId, Region};

/// Errors that can occur while loading or querying the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the content file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two questions share an id.
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    /// Two options of the same question share an id.
    #[error("duplicate option id {option} in question {question}")]
    DuplicateOption {
        /// The question containing the duplicate.
        question: QuestionId,
        /// The repeated option id.
        option: OptionId,
    },

    /// A question has no options to choose from.
    #[error("question {0} has no options")]
    EmptyOptions(QuestionId),

    /// A region has no questions, so it could never be completed meaningfully.
    #[error("region {0} has no questions")]
    EmptyRegion(Region),

    /// A karma gate lies outside `[0, 100]`.
    #[error("question {question} has karma gate {required} outside 0-100")]
    KarmaGateOutOfRange {
        /// The offending question.
        question: QuestionId,
        /// The configured gate.
        required: u8,
    },

    /// An item token looks like a fragment but names no known fragment kind.
    #[error("unknown item token {token:?} in question {question}")]
    UnknownItemToken {
        /// The question containing the token.
        question: QuestionId,
        /// The unparseable token.
        token: String,
    },

    /// No question with this id exists.
    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),

    /// The question exists but has no option with this id.
    #[error("option {option} not found in question {question}")]
    OptionNotFound {
        /// The question that was searched.
        question: QuestionId,
        /// The missing option id.
        option: OptionId,
    },
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
