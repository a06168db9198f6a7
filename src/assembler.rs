//! Document Assembly
//!
//! Builds the full-size markdown page the truncation engine consumes from
//! structured documentation data extracted by the scraping layer. The engine
//! assumes nothing about this shape beyond `##`-style headers, so upstream
//! sources with other layouts still truncate through the fallback path.

use serde::{Deserialize, Serialize};

/// Most code examples emitted per page.
pub const MAX_EXAMPLES: usize = 5;

/// Structured documentation for one class, as produced by the scraper glue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDocumentation {
    pub name: String,
    pub description: String,
    pub constructors: Vec<ConstructorDoc>,
    pub properties: Vec<PropertyDoc>,
    pub methods: Vec<MethodDoc>,
    /// Raw Dart snippets, in page order
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorDoc {
    /// Full header text including the parameter list
    pub name: String,
    pub signature: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDoc {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDoc {
    /// Full header text including the parameter list
    pub name: String,
    pub signature: String,
    pub description: String,
}

/// Assemble the canonical five-section markdown page.
pub fn assemble(doc: &ClassDocumentation) -> String {
    format!(
        "# {}\n\n## Description\n{}\n\n## Constructors\n{}\n\n## Properties\n{}\n\n## Methods\n{}\n\n## Code Examples\n{}\n",
        doc.name,
        format_description(&doc.description),
        format_constructors(&doc.constructors),
        format_properties(&doc.properties),
        format_methods(&doc.methods),
        format_examples(&doc.examples),
    )
}

fn format_description(description: &str) -> String {
    if description.trim().is_empty() {
        "No description available".to_string()
    } else {
        description.trim().to_string()
    }
}

fn format_constructors(constructors: &[ConstructorDoc]) -> String {
    if constructors.is_empty() {
        return "No constructors found".to_string();
    }

    let mut result = Vec::new();
    for constructor in constructors {
        result.push(format!("### {}", constructor.name));
        if !constructor.signature.trim().is_empty() {
            result.push(format!("```dart\n{}\n```", constructor.signature.trim()));
        }
        if !constructor.description.trim().is_empty() {
            result.push(constructor.description.trim().to_string());
        }
        result.push(String::new());
    }

    result.join("\n")
}

fn format_properties(properties: &[PropertyDoc]) -> String {
    if properties.is_empty() {
        return "No properties found".to_string();
    }

    properties
        .iter()
        .map(|p| {
            let desc = if p.description.trim().is_empty() {
                "No description"
            } else {
                p.description.trim()
            };
            format!("- **{}**: {}", p.name, desc)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_methods(methods: &[MethodDoc]) -> String {
    if methods.is_empty() {
        return "No methods found".to_string();
    }

    let mut result = Vec::new();
    for method in methods {
        result.push(format!("### {}", method.name));
        if !method.signature.trim().is_empty() {
            result.push(format!("```dart\n{}\n```", method.signature.trim()));
        }
        if !method.description.trim().is_empty() {
            result.push(method.description.trim().to_string());
        }
        result.push(String::new());
    }

    result.join("\n")
}

fn format_examples(examples: &[String]) -> String {
    if examples.is_empty() {
        return "No code examples found".to_string();
    }

    examples
        .iter()
        .take(MAX_EXAMPLES)
        .enumerate()
        .filter(|(_, code)| !code.trim().is_empty())
        .map(|(i, code)| format!("#### Example {}:\n```dart\n{}\n```\n", i + 1, code.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truncation::{parse_documentation, PriorityConfig};

    fn sample_class() -> ClassDocumentation {
        ClassDocumentation {
            name: "Opacity".to_string(),
            description: "A widget that makes its child partially transparent.".to_string(),
            constructors: vec![ConstructorDoc {
                name: "Opacity({Key? key, required double opacity, Widget? child})".to_string(),
                signature: "Opacity({\n  Key? key,\n  required this.opacity,\n  this.child,\n})"
                    .to_string(),
                description: "Creates a widget that makes its child partially transparent."
                    .to_string(),
            }],
            properties: vec![
                PropertyDoc {
                    name: "opacity".to_string(),
                    description: "The fraction to scale the child's alpha value".to_string(),
                },
                PropertyDoc {
                    name: "child".to_string(),
                    description: String::new(),
                },
            ],
            methods: vec![MethodDoc {
                name: "build(BuildContext context)".to_string(),
                signature: "Widget build(BuildContext context) {\n  return child;\n}".to_string(),
                description: "Describes the part of the user interface.".to_string(),
            }],
            examples: vec!["Opacity(\n  opacity: 0.5,\n  child: Text('hi'),\n)".to_string()],
        }
    }

    #[test]
    fn test_assemble_canonical_sections() {
        let page = assemble(&sample_class());

        assert!(page.starts_with("# Opacity\n"));
        let mut last = 0;
        for header in [
            "## Description",
            "## Constructors",
            "## Properties",
            "## Methods",
            "## Code Examples",
        ] {
            let pos = page.find(header).unwrap_or_else(|| panic!("{header} missing"));
            assert!(pos > last);
            last = pos;
        }
        assert!(page.contains("- **opacity**: The fraction"));
        assert!(page.contains("- **child**: No description"));
        assert!(page.contains("#### Example 1:"));
    }

    #[test]
    fn test_assemble_empty_class() {
        let page = assemble(&ClassDocumentation {
            name: "Mystery".to_string(),
            ..Default::default()
        });

        assert!(page.contains("No description available"));
        assert!(page.contains("No constructors found"));
        assert!(page.contains("No properties found"));
        assert!(page.contains("No methods found"));
        assert!(page.contains("No code examples found"));
    }

    #[test]
    fn test_examples_capped() {
        let mut doc = sample_class();
        doc.examples = (0..8).map(|i| format!("Example({i})")).collect();
        let page = assemble(&doc);

        assert!(page.contains("#### Example 5:"));
        assert!(!page.contains("#### Example 6:"));
    }

    #[test]
    fn test_assembled_page_parses_back() {
        // The assembler's output is the parser's expected input shape.
        let page = assemble(&sample_class());
        let sections = parse_documentation(&page, "Opacity", &PriorityConfig::standard());

        assert!(sections.iter().any(|s| s.name == "description"));
        assert!(sections.iter().any(|s| s.name == "constructor_sig_Opacity"));
        assert!(sections.iter().any(|s| s.name == "property_opacity"));
        assert!(sections.iter().any(|s| s.name == "method_build"));
        assert!(sections.iter().any(|s| s.name == "example_1"));
    }
}
