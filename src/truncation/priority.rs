//! Priority Classification
//!
//! Fixed tables of well-known Flutter member names plus the structural rules
//! that assign a priority tier to each parsed section. Every truncation pass
//! gets its own `PriorityConfig`, so strategies never mutate shared state.

use lazy_static::lazy_static;
use std::collections::HashSet;

use super::section::ContentPriority;

lazy_static! {
    /// Lifecycle and framework methods whose signatures matter most to callers.
    pub static ref HIGH_PRIORITY_METHODS: HashSet<&'static str> = [
        "build",
        "createState",
        "initState",
        "dispose",
        "setState",
        "didChangeDependencies",
        "didUpdateWidget",
    ]
    .into_iter()
    .collect();

    /// Properties that show up in nearly every widget usage.
    pub static ref HIGH_PRIORITY_PROPERTIES: HashSet<&'static str> = [
        "child",
        "children",
        "key",
        "padding",
        "margin",
        "color",
        "width",
        "height",
        "style",
        "controller",
        "onPressed",
        "onTap",
    ]
    .into_iter()
    .collect();

    /// Widgets common enough that doc lookups for them should rank first.
    /// Consulted by the search/lookup glue, not by the budget fill itself.
    pub static ref HIGH_PRIORITY_WIDGETS: HashSet<&'static str> = [
        "Container",
        "Scaffold",
        "Row",
        "Column",
        "Text",
        "ListView",
        "Stack",
        "AppBar",
        "Center",
        "Padding",
        "Icon",
        "Image",
        "TextField",
        "GestureDetector",
        "StatelessWidget",
        "StatefulWidget",
    ]
    .into_iter()
    .collect();
}

/// How many leading code examples get the Medium tier; the rest are Low.
pub const MEDIUM_PRIORITY_EXAMPLES: usize = 2;

/// Per-call priority tables.
///
/// A strategy builds one of these before a truncation pass; nothing is
/// restored afterwards because nothing shared was touched.
#[derive(Debug, Clone)]
pub struct PriorityConfig {
    high_priority_methods: HashSet<&'static str>,
    high_priority_properties: HashSet<&'static str>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl PriorityConfig {
    /// The standard tables, unmodified.
    pub fn standard() -> Self {
        Self {
            high_priority_methods: HIGH_PRIORITY_METHODS.clone(),
            high_priority_properties: HIGH_PRIORITY_PROPERTIES.clone(),
        }
    }

    /// Standard method table, no property boost. Relative weight shifts
    /// toward constructor/method signatures.
    pub fn without_property_boost() -> Self {
        Self {
            high_priority_methods: HIGH_PRIORITY_METHODS.clone(),
            high_priority_properties: HashSet::new(),
        }
    }

    /// Only the most load-bearing names survive; everything else collapses
    /// to Medium/Low so a tight budget keeps descriptions and core
    /// signatures only.
    pub fn minimal() -> Self {
        Self {
            high_priority_methods: ["build"].into_iter().collect(),
            high_priority_properties: ["child", "children"].into_iter().collect(),
        }
    }

    /// Priority of a method signature, from the base name (no parameter list).
    pub fn method_priority(&self, base_name: &str) -> ContentPriority {
        if self.high_priority_methods.contains(base_name) {
            ContentPriority::High
        } else if base_name.starts_with('_') {
            ContentPriority::Low
        } else {
            ContentPriority::Medium
        }
    }

    /// Priority of a property line.
    pub fn property_priority(&self, name: &str) -> ContentPriority {
        if self.high_priority_properties.contains(name) {
            ContentPriority::High
        } else {
            ContentPriority::Medium
        }
    }

    /// Priority of the nth code example (0-based).
    pub fn example_priority(&self, index: usize) -> ContentPriority {
        if index < MEDIUM_PRIORITY_EXAMPLES {
            ContentPriority::Medium
        } else {
            ContentPriority::Low
        }
    }

    /// Whether a class name is one of the universally common widgets.
    pub fn is_high_priority_widget(&self, name: &str) -> bool {
        HIGH_PRIORITY_WIDGETS.contains(name)
    }

    /// Number of names in the high-priority property table.
    pub fn property_table_len(&self) -> usize {
        self.high_priority_properties.len()
    }
}
