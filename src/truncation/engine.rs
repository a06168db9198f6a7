//! Truncation Engine
//!
//! Priority-driven budget fill over parsed sections, with a flat
//! boundary-trimming fallback for documents that carry no recognizable
//! structure. Selection order (priority, size) and presentation order
//! (canonical document order) are independent.

use std::collections::BTreeMap;
use tracing::debug;

use super::parser::parse_documentation;
use super::priority::PriorityConfig;
use super::section::{
    DocumentationSection, SectionCategory, CODE_CHARS_PER_TOKEN, PROSE_CHARS_PER_TOKEN,
};
use super::tokens::estimate_markdown;

/// Default token ceiling when none is given.
pub const DEFAULT_MAX_TOKENS: usize = 4000;

/// Smallest leftover budget worth spending on a partial section.
pub const MIN_PARTIAL_TOKENS: usize = 50;

const TRUNCATION_NOTICE: &str = "\n---\n*Note: This documentation has been truncated to fit \
within token limits. Some sections may have been omitted or shortened.*";

/// Priority-based truncation for Flutter/Dart documentation pages.
pub struct SmartTruncator {
    max_tokens: usize,
    config: PriorityConfig,
}

impl Default for SmartTruncator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

impl SmartTruncator {
    pub fn new(max_tokens: usize) -> Self {
        Self::with_config(max_tokens, PriorityConfig::standard())
    }

    pub fn with_config(max_tokens: usize, config: PriorityConfig) -> Self {
        Self { max_tokens, config }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Truncate a documentation page to the configured token ceiling.
    ///
    /// Within budget, the content comes back byte-for-byte unchanged with no
    /// notice. Oversized input always yields something shorter; never an
    /// error. A budget smaller than the minimum viable chunk degrades to
    /// title plus notice.
    pub fn truncate_documentation(&self, content: &str, subject: &str) -> String {
        let estimated = estimate_markdown(content);
        if estimated <= self.max_tokens {
            return content.to_string();
        }

        let sections = parse_documentation(content, subject, &self.config);
        if sections.is_empty() {
            // No recognizable structure: flat boundary trim.
            let cut = simple_truncate(content, self.max_tokens);
            if cut.len() == content.len() {
                return content.to_string();
            }
            return add_truncation_notice(&cut);
        }

        let total = sections.len();
        let kept = self.fill_budget(sections);
        debug!(
            subject = %subject,
            budget = self.max_tokens,
            kept = kept.len(),
            parsed = total,
            "Structural truncation"
        );

        let doc = self.reassemble(content, subject, &kept);
        add_truncation_notice(&doc)
    }

    /// Greedy single-pass fill: sections in (priority, size-descending)
    /// order, one optional partial keep at the boundary, then stop. Not a
    /// knapsack; simplicity over optimality.
    fn fill_budget(&self, mut sections: Vec<DocumentationSection>) -> Vec<DocumentationSection> {
        sections.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.token_estimate.cmp(&a.token_estimate))
        });

        let mut kept = Vec::new();
        let mut used = 0usize;

        for section in sections {
            if used + section.token_estimate <= self.max_tokens {
                used += section.token_estimate;
                kept.push(section);
                continue;
            }

            let remaining = self.max_tokens - used;
            if remaining >= MIN_PARTIAL_TOKENS {
                let trimmed = if section.is_code {
                    truncate_code(&section.content, remaining)
                } else {
                    truncate_prose(&section.content, remaining)
                };
                if !trimmed.trim().is_empty() {
                    kept.push(section.with_content(trimmed));
                }
            }
            break;
        }

        kept
    }

    /// Regroup kept sections into canonical document order, re-emitting the
    /// category headers. The title comes from the source document, or is
    /// synthesized from the subject when even the title was lost.
    fn reassemble(
        &self,
        content: &str,
        subject: &str,
        kept: &[DocumentationSection],
    ) -> String {
        let title = content
            .lines()
            .find(|l| l.starts_with("# "))
            .map(str::to_string)
            .unwrap_or_else(|| format!("# {subject}"));

        let mut groups: BTreeMap<SectionCategory, Vec<&DocumentationSection>> = BTreeMap::new();
        for section in kept {
            groups.entry(section.kind.category()).or_default().push(section);
        }

        let mut parts = vec![title];
        for category in SectionCategory::ORDER {
            if let Some(sections) = groups.get_mut(&category) {
                sections.sort_by_key(|s| s.source_index);
                if let Some(header) = category.header() {
                    parts.push(header.to_string());
                }
                for section in sections.iter().filter(|s| !s.content.is_empty()) {
                    parts.push(section.content.clone());
                }
            }
        }

        parts.join("\n\n")
    }
}

/// Trim a code section to roughly `token_budget` tokens.
///
/// Cuts at the last complete line, marks the cut with a comment placeholder,
/// and appends closing brackets for whatever was left open at the cut point.
/// Best-effort syntactic plausibility, not valid code.
pub fn truncate_code(code: &str, token_budget: usize) -> String {
    let char_budget = token_budget.saturating_mul(CODE_CHARS_PER_TOKEN);
    if code.len() <= char_budget {
        return code.to_string();
    }

    let cut = floor_char_boundary(code, char_budget);
    let kept = match code[..cut].rfind('\n') {
        Some(pos) => &code[..pos],
        None => &code[..cut],
    };

    let mut stack: Vec<char> = Vec::new();
    let mut fence_open = false;
    for line in kept.lines() {
        if line.trim_start().starts_with("```") {
            fence_open = !fence_open;
            continue;
        }
        for ch in line.chars() {
            match ch {
                '{' | '[' | '(' => stack.push(ch),
                '}' => {
                    if stack.last() == Some(&'{') {
                        stack.pop();
                    }
                }
                ']' => {
                    if stack.last() == Some(&'[') {
                        stack.pop();
                    }
                }
                ')' => {
                    if stack.last() == Some(&'(') {
                        stack.pop();
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = kept.trim_end().to_string();
    out.push_str("\n// ... (truncated)");
    if !stack.is_empty() {
        let closers: String = stack
            .iter()
            .rev()
            .map(|c| match c {
                '{' => '}',
                '[' => ']',
                _ => ')',
            })
            .collect();
        out.push('\n');
        out.push_str(&closers);
    }
    if fence_open {
        out.push_str("\n```");
    }
    out
}

/// Trim prose to roughly `token_budget` tokens, preferring a sentence end in
/// the trailing quarter of the window, then a whitespace boundary. Never
/// cuts mid-word when a boundary exists.
pub fn truncate_prose(text: &str, token_budget: usize) -> String {
    let char_budget = token_budget.saturating_mul(PROSE_CHARS_PER_TOKEN);
    if text.len() <= char_budget {
        return text.to_string();
    }

    let cut = floor_char_boundary(text, char_budget);
    let truncated = &text[..cut];
    let window_start = char_budget.saturating_mul(3) / 4;

    let sentence_end = truncated
        .char_indices()
        .filter(|(i, c)| matches!(c, '.' | '!' | '?') && *i >= window_start)
        .map(|(i, _)| i)
        .last();

    let kept = if let Some(pos) = sentence_end {
        &truncated[..pos + 1]
    } else if let Some(pos) = truncated.rfind(char::is_whitespace) {
        &truncated[..pos]
    } else {
        truncated
    };

    format!("{} ... (truncated)", kept.trim_end())
}

/// Flat truncation for unstructured documents, and the base primitive for
/// budget-fitting arbitrary text. Returns the content unchanged when it
/// already fits. Cut preference: paragraph break in the trailing 20% of the
/// window, then sentence end there, then the last whitespace.
pub fn simple_truncate(content: &str, token_budget: usize) -> String {
    let char_limit = token_budget.saturating_mul(PROSE_CHARS_PER_TOKEN);
    if content.len() <= char_limit {
        return content.to_string();
    }

    let cut = floor_char_boundary(content, char_limit);
    let truncated = &content[..cut];
    let threshold = (char_limit as f64 * 0.8) as usize;

    if let Some(pos) = truncated.rfind("\n\n") {
        if pos > threshold {
            return truncated[..pos].to_string();
        }
    }
    if let Some(pos) = truncated.rfind(". ") {
        if pos > threshold {
            return truncated[..pos + 1].to_string();
        }
    }
    if let Some(pos) = truncated.rfind(' ') {
        if pos > 0 {
            return truncated[..pos].to_string();
        }
    }
    truncated.to_string()
}

/// Append the document-level truncation notice. Added after the budget
/// check; the notice never counts against the budget.
pub fn add_truncation_notice(content: &str) -> String {
    let mut out = content.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(TRUNCATION_NOTICE);
    out
}

/// Largest index `<= index` that falls on a UTF-8 char boundary.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
