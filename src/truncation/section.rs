//! Documentation Section Model
//!
//! Labeled, priority-tagged fragments of a documentation page. Each section
//! carries its token estimate from construction; trimming produces new values.

use serde::{Deserialize, Serialize};

/// Characters per token for prose content
pub const PROSE_CHARS_PER_TOKEN: usize = 4;
/// Characters per token for code content (denser tokenization)
pub const CODE_CHARS_PER_TOKEN: usize = 3;

/// Importance tier controlling inclusion order under a token budget.
/// Lower tier = more important, sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPriority {
    /// Class description, constructor signatures - always kept if at all possible
    Critical = 1,
    /// Well-known methods/properties, constructor descriptions
    High = 2,
    /// Ordinary members, first code examples
    Medium = 3,
    /// Private members, later examples
    Low = 4,
    /// Inherited/auxiliary content, unknown sections
    Minimal = 5,
}

impl ContentPriority {
    /// One tier less important, saturating at the lowest tier.
    pub fn demote(self) -> Self {
        match self {
            ContentPriority::Critical => ContentPriority::High,
            ContentPriority::High => ContentPriority::Medium,
            ContentPriority::Medium => ContentPriority::Low,
            ContentPriority::Low | ContentPriority::Minimal => ContentPriority::Minimal,
        }
    }

    /// Numeric rank (1 = highest priority).
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// What a section is, fixed at construction.
///
/// Carried explicitly so downstream code never has to re-derive meaning from
/// the section name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Description,
    ConstructorSignature,
    ConstructorDescription,
    Property,
    MethodSignature,
    MethodDescription,
    Example,
    /// Unrecognized `##` section (See Also, Implementation, ...)
    Other,
}

impl SectionKind {
    /// Presentation category this kind belongs to when reassembling output.
    pub fn category(self) -> SectionCategory {
        match self {
            SectionKind::Description => SectionCategory::Description,
            SectionKind::ConstructorSignature | SectionKind::ConstructorDescription => {
                SectionCategory::Constructors
            }
            SectionKind::Property => SectionCategory::Properties,
            SectionKind::MethodSignature | SectionKind::MethodDescription => {
                SectionCategory::Methods
            }
            SectionKind::Example => SectionCategory::Examples,
            SectionKind::Other => SectionCategory::Other,
        }
    }

    /// Whether sections of this kind are primarily fenced code.
    pub fn is_code(self) -> bool {
        matches!(
            self,
            SectionKind::ConstructorSignature | SectionKind::MethodSignature | SectionKind::Example
        )
    }
}

/// Canonical output grouping, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionCategory {
    Description,
    Constructors,
    Properties,
    Methods,
    Examples,
    Other,
}

impl SectionCategory {
    /// All categories in canonical presentation order.
    pub const ORDER: [SectionCategory; 6] = [
        SectionCategory::Description,
        SectionCategory::Constructors,
        SectionCategory::Properties,
        SectionCategory::Methods,
        SectionCategory::Examples,
        SectionCategory::Other,
    ];

    /// Markdown header emitted before this category's sections.
    /// `Other` sections carry their own headers.
    pub fn header(self) -> Option<&'static str> {
        match self {
            SectionCategory::Description => Some("## Description"),
            SectionCategory::Constructors => Some("## Constructors"),
            SectionCategory::Properties => Some("## Properties"),
            SectionCategory::Methods => Some("## Methods"),
            SectionCategory::Examples => Some("## Code Examples"),
            SectionCategory::Other => None,
        }
    }
}

/// A single unit of truncation.
///
/// `char_count` and `token_estimate` are pure functions of `content` and
/// `is_code`, computed once here. Sections are never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationSection {
    /// Stable identifier, e.g. `description`, `constructor_sig_Container`,
    /// `method_build`, `example_3`
    pub name: String,
    pub kind: SectionKind,
    pub content: String,
    pub priority: ContentPriority,
    pub is_code: bool,
    /// Position within the source document, for stable ordering inside a category
    pub source_index: usize,
    pub char_count: usize,
    pub token_estimate: usize,
}

impl DocumentationSection {
    /// Build a section, deriving `is_code` from the kind and computing the
    /// char-based token estimate.
    pub fn new(
        name: impl Into<String>,
        kind: SectionKind,
        content: impl Into<String>,
        priority: ContentPriority,
        source_index: usize,
    ) -> Self {
        let name = name.into();
        let content = content.into();
        let is_code = kind.is_code();
        let char_count = content.len();
        let token_estimate = estimate_section_tokens(char_count, is_code);

        Self {
            name,
            kind,
            content,
            priority,
            is_code,
            source_index,
            char_count,
            token_estimate,
        }
    }

    /// A new section with the same identity but trimmed content.
    /// Estimates are recomputed; the original is untouched.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self::new(
            self.name.clone(),
            self.kind,
            content,
            self.priority,
            self.source_index,
        )
    }
}

/// Char-based token estimate for a section body.
pub fn estimate_section_tokens(char_count: usize, is_code: bool) -> usize {
    let divisor = if is_code {
        CODE_CHARS_PER_TOKEN
    } else {
        PROSE_CHARS_PER_TOKEN
    };
    (char_count as f64 / divisor as f64).ceil() as usize
}
