// Flutterdocs Library
// Exports the document assembly and truncation core for use by the doc
// server glue and the CLI binary

pub mod assembler;
pub mod truncation;

// Re-export commonly used types for CLI and server glue
pub use assembler::{
    assemble, ClassDocumentation, ConstructorDoc, MethodDoc, PropertyDoc, MAX_EXAMPLES,
};

pub use truncation::engine::{simple_truncate, SmartTruncator, DEFAULT_MAX_TOKENS};
pub use truncation::priority::{PriorityConfig, HIGH_PRIORITY_WIDGETS};
pub use truncation::section::{ContentPriority, DocumentationSection, SectionCategory, SectionKind};
pub use truncation::strategy::{
    truncate_flutter_docs, AdaptiveTruncator, TruncationError, TruncationMetadata,
    TruncationStrategy,
};
pub use truncation::tokens::{
    accurate_tokens, approximate_tokens, count_tokens, counting_mode, estimate_cost,
    estimate_markdown, set_accurate_mode,
};
