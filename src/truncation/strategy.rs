//! Truncation Strategies
//!
//! Named presets that bias priority classification for one truncation pass.
//! Each invocation builds its own priority tables, so concurrent calls with
//! different strategies cannot observe each other's bias.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use super::engine::SmartTruncator;
use super::priority::PriorityConfig;

#[derive(Error, Debug)]
pub enum TruncationError {
    #[error("Unknown truncation strategy: {0}")]
    InvalidStrategy(String),
    #[error("Token budget must be positive")]
    InvalidBudget,
}

impl Serialize for TruncationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Named bias profile applied to one truncation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationStrategy {
    /// Standard priority tables, unmodified
    Balanced,
    /// No property boost; weight shifts to constructor/method signatures
    Signatures,
    /// Standard tables; examples already rank ahead of later members
    /// structurally, so this is currently equivalent to balanced
    Examples,
    /// Only the most load-bearing method/property names keep their boost
    Minimal,
}

impl Default for TruncationStrategy {
    fn default() -> Self {
        TruncationStrategy::Balanced
    }
}

impl TruncationStrategy {
    /// Build the priority tables this strategy biases.
    pub fn priority_config(&self) -> PriorityConfig {
        match self {
            TruncationStrategy::Balanced | TruncationStrategy::Examples => {
                PriorityConfig::standard()
            }
            TruncationStrategy::Signatures => PriorityConfig::without_property_boost(),
            TruncationStrategy::Minimal => PriorityConfig::minimal(),
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            TruncationStrategy::Balanced => "balanced",
            TruncationStrategy::Signatures => "signatures",
            TruncationStrategy::Examples => "examples",
            TruncationStrategy::Minimal => "minimal",
        }
    }
}

impl FromStr for TruncationStrategy {
    type Err = TruncationError;

    /// Unknown names fail closed rather than silently defaulting.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(TruncationStrategy::Balanced),
            "signatures" => Ok(TruncationStrategy::Signatures),
            "examples" => Ok(TruncationStrategy::Examples),
            "minimal" => Ok(TruncationStrategy::Minimal),
            other => Err(TruncationError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Result metadata, computed fresh per call and never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationMetadata {
    pub original_length: usize,
    pub truncated_length: usize,
    pub compression_ratio: f64,
    pub strategy_used: String,
    pub was_truncated: bool,
}

/// Strategy-aware truncation entry point.
pub struct AdaptiveTruncator {
    max_tokens: usize,
}

impl AdaptiveTruncator {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Truncate one documentation page under a named strategy.
    ///
    /// The strategy's tables live only for this call; a concurrent call with
    /// a different strategy sees its own tables. `library` is the doc
    /// library the page came from (widgets, material, ...), recorded in logs.
    pub fn truncate_with_strategy(
        &self,
        content: &str,
        subject: &str,
        library: &str,
        strategy_name: &str,
    ) -> Result<(String, TruncationMetadata), TruncationError> {
        if self.max_tokens == 0 {
            return Err(TruncationError::InvalidBudget);
        }
        let strategy = TruncationStrategy::from_str(strategy_name)?;

        debug!(
            subject = %subject,
            library = %library,
            strategy = strategy.name(),
            max_tokens = self.max_tokens,
            "Truncating documentation"
        );

        let truncator = SmartTruncator::with_config(self.max_tokens, strategy.priority_config());
        let result = truncator.truncate_documentation(content, subject);

        let original_length = content.len();
        let truncated_length = result.len();
        let compression_ratio = if original_length > 0 {
            truncated_length as f64 / original_length as f64
        } else {
            1.0
        };

        let metadata = TruncationMetadata {
            original_length,
            truncated_length,
            compression_ratio,
            strategy_used: strategy.name().to_string(),
            was_truncated: result != content,
        };

        Ok((result, metadata))
    }
}

/// Truncate Flutter documentation to fit within a token limit.
///
/// Convenience wrapper over [`AdaptiveTruncator`] for callers that do not
/// need the metadata.
pub fn truncate_flutter_docs(
    content: &str,
    class_name: &str,
    max_tokens: usize,
    strategy: &str,
) -> Result<String, TruncationError> {
    let truncator = AdaptiveTruncator::new(max_tokens);
    let (result, _) = truncator.truncate_with_strategy(content, class_name, "widgets", strategy)?;
    Ok(result)
}
