//! Documentation Parsing
//!
//! Partitions an assembled markdown page into fine-grained, prioritized
//! sections along `##`/`###`/`####` boundaries. Constructors and methods are
//! split into signature and description sections because signatures are
//! non-negotiable for usability while descriptions are compressible.

use tracing::debug;

use super::priority::PriorityConfig;
use super::section::{ContentPriority, DocumentationSection, SectionKind};

/// Parse a documentation page into prioritized sections.
///
/// Returns an empty vector when the document carries no `##` headers at
/// all; callers then fall back to flat boundary truncation.
pub fn parse_documentation(
    content: &str,
    subject: &str,
    config: &PriorityConfig,
) -> Vec<DocumentationSection> {
    let mut sections = Vec::new();
    let mut index = 0usize;

    for block in top_level_blocks(content) {
        let key = block.header.to_lowercase();
        match key.as_str() {
            "description" | "summary" => {
                parse_description(&block, &mut sections, &mut index);
            }
            "constructors" => {
                parse_constructors(&block, &mut sections, &mut index);
            }
            "properties" => {
                parse_properties(&block, config, &mut sections, &mut index);
            }
            "methods" => {
                parse_methods(&block, config, &mut sections, &mut index);
            }
            "code examples" | "examples" => {
                parse_examples(&block, config, &mut sections, &mut index);
            }
            _ => {
                // Unrecognized section (See Also, Implementation, ...): kept
                // whole at the lowest tier, carrying its own header.
                let mut body = Vec::with_capacity(block.lines.len() + 1);
                body.push(format!("## {}", block.header));
                body.extend(block.lines.iter().map(|l| l.to_string()));
                push_section(
                    &mut sections,
                    &mut index,
                    format!("other_{}", slugify(&block.header)),
                    SectionKind::Other,
                    body.join("\n").trim_end().to_string(),
                    ContentPriority::Minimal,
                );
            }
        }
    }

    debug!(
        subject = %subject,
        section_count = sections.len(),
        "Parsed documentation sections"
    );

    sections
}

/// A `## Header` block and its body lines (up to the next `## `).
struct TopBlock<'a> {
    header: &'a str,
    lines: Vec<&'a str>,
}

fn top_level_blocks(content: &str) -> Vec<TopBlock<'_>> {
    let mut blocks: Vec<TopBlock<'_>> = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        let is_fence_line = line.trim_start().starts_with("```");
        if !in_fence {
            if let Some(header) = line.strip_prefix("## ") {
                blocks.push(TopBlock {
                    header: header.trim(),
                    lines: Vec::new(),
                });
                continue;
            }
        }
        if let Some(block) = blocks.last_mut() {
            block.lines.push(line);
        }
        // Lines before the first `##` (title, preamble) are handled by the
        // reassembly step, not treated as a section.
        if is_fence_line {
            in_fence = !in_fence;
        }
    }

    blocks
}

/// A `###`- or `####`-delimited sub-block inside a top-level section.
struct SubBlock<'a> {
    header: &'a str,
    lines: Vec<&'a str>,
}

fn sub_blocks<'a>(lines: &[&'a str], marker: &str) -> Vec<SubBlock<'a>> {
    let mut blocks: Vec<SubBlock<'a>> = Vec::new();
    let mut in_fence = false;

    for &line in lines {
        let is_fence_line = line.trim_start().starts_with("```");
        if !in_fence && line.starts_with(marker) {
            blocks.push(SubBlock {
                header: line[marker.len()..].trim(),
                lines: Vec::new(),
            });
        } else if let Some(block) = blocks.last_mut() {
            block.lines.push(line);
        }
        if is_fence_line {
            in_fence = !in_fence;
        }
    }

    blocks
}

/// Split a sub-block body into its fenced code block and surrounding prose.
/// Fenced content is opaque: it is never divided at a backtick boundary.
fn split_code_and_prose(lines: &[&str]) -> (Option<String>, String) {
    let mut code: Vec<&str> = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut saw_fence = false;

    for &line in lines {
        let is_fence_line = line.trim_start().starts_with("```");
        if is_fence_line {
            saw_fence = true;
            code.push(line);
            in_fence = !in_fence;
        } else if in_fence {
            code.push(line);
        } else {
            prose.push(line);
        }
    }

    let code = if saw_fence { Some(code.join("\n")) } else { None };
    (code, prose.join("\n").trim().to_string())
}

/// Member base name: header text up to the parameter list.
fn base_name(header: &str) -> &str {
    header
        .split(|c| c == '(' || c == ' ')
        .next()
        .unwrap_or(header)
        .trim()
}

fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn push_section(
    sections: &mut Vec<DocumentationSection>,
    index: &mut usize,
    name: String,
    kind: SectionKind,
    content: String,
    priority: ContentPriority,
) {
    sections.push(DocumentationSection::new(
        name, kind, content, priority, *index,
    ));
    *index += 1;
}

fn parse_description(
    block: &TopBlock<'_>,
    sections: &mut Vec<DocumentationSection>,
    index: &mut usize,
) {
    let body = block.lines.join("\n").trim().to_string();
    // An empty header still yields a zero-token section, counted for
    // completeness.
    push_section(
        sections,
        index,
        "description".to_string(),
        SectionKind::Description,
        body,
        ContentPriority::Critical,
    );
}

fn parse_constructors(
    block: &TopBlock<'_>,
    sections: &mut Vec<DocumentationSection>,
    index: &mut usize,
) {
    let blocks = sub_blocks(&block.lines, "### ");
    if blocks.is_empty() {
        push_section(
            sections,
            index,
            "constructors".to_string(),
            SectionKind::ConstructorSignature,
            block.lines.join("\n").trim().to_string(),
            ContentPriority::Critical,
        );
        return;
    }

    for sub in blocks {
        let name = base_name(sub.header);
        let (code, prose) = split_code_and_prose(&sub.lines);

        let mut signature = format!("### {}", sub.header);
        if let Some(code) = code {
            signature.push('\n');
            signature.push_str(&code);
        }
        push_section(
            sections,
            index,
            format!("constructor_sig_{name}"),
            SectionKind::ConstructorSignature,
            signature,
            ContentPriority::Critical,
        );

        if !prose.is_empty() {
            push_section(
                sections,
                index,
                format!("constructor_desc_{name}"),
                SectionKind::ConstructorDescription,
                prose,
                ContentPriority::High,
            );
        }
    }
}

fn parse_properties(
    block: &TopBlock<'_>,
    config: &PriorityConfig,
    sections: &mut Vec<DocumentationSection>,
    index: &mut usize,
) {
    // One section per `- **name**: description` bullet; continuation lines
    // belong to the preceding bullet.
    let mut current: Option<(String, Vec<String>)> = None;
    let mut found_any = false;

    let mut flush = |current: &mut Option<(String, Vec<String>)>,
                     sections: &mut Vec<DocumentationSection>,
                     index: &mut usize| {
        if let Some((name, lines)) = current.take() {
            let priority = config.property_priority(&name);
            push_section(
                sections,
                index,
                format!("property_{name}"),
                SectionKind::Property,
                lines.join("\n").trim_end().to_string(),
                priority,
            );
        }
    };

    for line in &block.lines {
        if let Some(rest) = line.strip_prefix("- **") {
            flush(&mut current, sections, index);
            let name = rest.split("**").next().unwrap_or("").trim().to_string();
            current = Some((name, vec![line.to_string()]));
            found_any = true;
        } else if let Some((_, lines)) = current.as_mut() {
            if !line.trim().is_empty() {
                lines.push(line.to_string());
            }
        }
    }
    flush(&mut current, sections, index);

    if !found_any {
        // No bullets: keep whatever body text is there as a single section.
        push_section(
            sections,
            index,
            "properties".to_string(),
            SectionKind::Property,
            block.lines.join("\n").trim().to_string(),
            ContentPriority::Medium,
        );
    }
}

fn parse_methods(
    block: &TopBlock<'_>,
    config: &PriorityConfig,
    sections: &mut Vec<DocumentationSection>,
    index: &mut usize,
) {
    let blocks = sub_blocks(&block.lines, "### ");
    if blocks.is_empty() {
        push_section(
            sections,
            index,
            "methods".to_string(),
            SectionKind::MethodSignature,
            block.lines.join("\n").trim().to_string(),
            ContentPriority::Medium,
        );
        return;
    }

    for sub in blocks {
        let name = base_name(sub.header);
        let sig_priority = config.method_priority(name);
        let (code, prose) = split_code_and_prose(&sub.lines);

        let mut signature = format!("### {}", sub.header);
        if let Some(code) = code {
            signature.push('\n');
            signature.push_str(&code);
        }
        push_section(
            sections,
            index,
            format!("method_{name}"),
            SectionKind::MethodSignature,
            signature,
            sig_priority,
        );

        // Low-value methods keep only their signature; the description is
        // dropped outright rather than trimmed.
        if sig_priority != ContentPriority::Low && !prose.is_empty() {
            push_section(
                sections,
                index,
                format!("method_desc_{name}"),
                SectionKind::MethodDescription,
                prose,
                sig_priority.demote(),
            );
        }
    }
}

fn parse_examples(
    block: &TopBlock<'_>,
    config: &PriorityConfig,
    sections: &mut Vec<DocumentationSection>,
    index: &mut usize,
) {
    let blocks = sub_blocks(&block.lines, "#### ");
    if blocks.is_empty() {
        let body = block.lines.join("\n").trim().to_string();
        push_section(
            sections,
            index,
            "example_1".to_string(),
            SectionKind::Example,
            body,
            config.example_priority(0),
        );
        return;
    }

    for (i, sub) in blocks.into_iter().enumerate() {
        let mut content = format!("#### {}", sub.header);
        let body = sub.lines.join("\n");
        let body = body.trim_end();
        if !body.trim().is_empty() {
            content.push('\n');
            content.push_str(body);
        }
        push_section(
            sections,
            index,
            format!("example_{}", i + 1),
            SectionKind::Example,
            content,
            config.example_priority(i),
        );
    }
}
