//! Token counting using tiktoken-rs with a word-based fallback.
//!
//! Uses cl100k_base encoding for exact counts. The encoder is built lazily
//! once per process; if it cannot be constructed, counting degrades to the
//! word-based approximation and the degradation is only visible in logs.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use tiktoken_rs::{cl100k_base, CoreBPE};
use tracing::{debug, info, warn};

use super::section::{CODE_CHARS_PER_TOKEN, PROSE_CHARS_PER_TOKEN};

/// Average tokens per word, empirical.
pub const TOKENS_PER_WORD: f64 = 1.3;

/// Environment variable that enables accurate counting at startup.
pub const ACCURATE_TOKENS_ENV: &str = "FLUTTERDOCS_EXACT_TOKENS";

/// Lazily-initialized cl100k_base encoder, shared process-wide
static ENCODER: RwLock<EncoderSlot> = RwLock::new(EncoderSlot::Untried);

/// Global token cache to avoid recounting identical content
static TOKEN_CACHE: RwLock<Option<TokenCache>> = RwLock::new(None);

lazy_static! {
    static ref ACCURATE_MODE: AtomicBool = AtomicBool::new(accurate_mode_from_env());
}

enum EncoderSlot {
    Untried,
    Unavailable,
    Ready(CoreBPE),
}

/// Cache for exact token counts, keyed by content hash
pub struct TokenCache {
    cache: HashMap<u64, usize>,
    max_size: usize,
}

impl TokenCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size),
            max_size,
        }
    }

    fn get(&self, hash: u64) -> Option<usize> {
        self.cache.get(&hash).copied()
    }

    fn insert(&mut self, hash: u64, count: usize) {
        // Simple LRU: if at capacity, clear half the cache
        if self.cache.len() >= self.max_size {
            let keys_to_remove: Vec<_> =
                self.cache.keys().take(self.max_size / 2).copied().collect();
            for key in keys_to_remove {
                self.cache.remove(&key);
            }
        }
        self.cache.insert(hash, count);
    }
}

fn accurate_mode_from_env() -> bool {
    std::env::var(ACCURATE_TOKENS_ENV)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}

fn ensure_cache_initialized() {
    let mut cache = TOKEN_CACHE.write();
    if cache.is_none() {
        *cache = Some(TokenCache::new(10_000));
    }
}

fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Approximate token count using word-based estimation.
///
/// Fast, dependency-free: counts word runs and applies ~1.3 tokens per word.
/// Used at the response-layer boundary; truncation decisions use the
/// char-based estimators below.
pub fn approximate_tokens(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    let word_count = text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .count();

    (word_count as f64 * TOKENS_PER_WORD) as usize
}

/// Count tokens exactly using the cl100k_base encoder.
///
/// Returns `None` when the encoder cannot be constructed; callers fall back
/// to approximation. Results are cached by content hash.
pub fn accurate_tokens(text: &str) -> Option<usize> {
    if text.is_empty() {
        return Some(0);
    }

    ensure_encoder_initialized()?;
    ensure_cache_initialized();
    let content_hash = hash_content(text);

    {
        let cache = TOKEN_CACHE.read();
        if let Some(ref c) = *cache {
            if let Some(count) = c.get(content_hash) {
                return Some(count);
            }
        }
    }

    let count = {
        let encoder = ENCODER.read();
        match *encoder {
            EncoderSlot::Ready(ref bpe) => bpe.encode_with_special_tokens(text).len(),
            _ => return None,
        }
    };

    {
        let mut cache = TOKEN_CACHE.write();
        if let Some(ref mut c) = *cache {
            c.insert(content_hash, count);
        }
    }

    debug!(token_count = count, text_length = text.len(), "Accurate token count");
    Some(count)
}

/// Build the encoder on first use. Idempotent under concurrent callers: the
/// write lock serializes initialization and a second attempt sees the slot
/// already settled.
fn ensure_encoder_initialized() -> Option<()> {
    {
        let slot = ENCODER.read();
        match *slot {
            EncoderSlot::Ready(_) => return Some(()),
            EncoderSlot::Unavailable => return None,
            EncoderSlot::Untried => {}
        }
    }

    let mut slot = ENCODER.write();
    if let EncoderSlot::Untried = *slot {
        match cl100k_base() {
            Ok(bpe) => {
                info!("cl100k_base encoder loaded");
                *slot = EncoderSlot::Ready(bpe);
            }
            Err(e) => {
                warn!(error = %e, "cl100k_base encoder unavailable, falling back to approximation");
                *slot = EncoderSlot::Unavailable;
            }
        }
    }
    match *slot {
        EncoderSlot::Ready(_) => Some(()),
        _ => None,
    }
}

/// Count tokens using the configured method.
///
/// Accurate counting is used when enabled process-wide (see
/// [`set_accurate_mode`]) or forced per call; on failure it degrades to the
/// approximation and never surfaces an error for that reason alone.
pub fn count_tokens(text: &str, force_accurate: bool) -> usize {
    if text.is_empty() {
        return 0;
    }

    if force_accurate || accurate_mode() {
        if let Some(count) = accurate_tokens(text) {
            return count;
        }
        info!("Falling back to approximation, accurate counting unavailable");
    }

    approximate_tokens(text)
}

/// Whether accurate counting is currently enabled.
pub fn accurate_mode() -> bool {
    ACCURATE_MODE.load(Ordering::Relaxed)
}

/// Dynamically enable or disable accurate token counting.
pub fn set_accurate_mode(enabled: bool) {
    ACCURATE_MODE.store(enabled, Ordering::Relaxed);
    info!(accurate_mode = enabled, "Token counting mode changed");
}

/// Current counting mode as a display string.
pub fn counting_mode() -> &'static str {
    if accurate_mode() {
        "accurate"
    } else {
        "approximate"
    }
}

/// Char-based token estimate for markdown, the authoritative estimator for
/// every truncation decision.
///
/// Fenced code tokenizes denser than prose, so characters inside ``` fences
/// count at the code ratio and everything else at the prose ratio. Section
/// estimates use the same divisors, keeping document gating and per-section
/// budgeting consistent with each other.
pub fn estimate_markdown(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let mut code_chars = 0usize;
    let mut prose_chars = 0usize;
    let mut in_fence = false;

    for line in text.lines() {
        let is_fence_line = line.trim_start().starts_with("```");
        if is_fence_line || in_fence {
            code_chars += line.len() + 1;
        } else {
            prose_chars += line.len() + 1;
        }
        if is_fence_line {
            in_fence = !in_fence;
        }
    }

    let code_tokens = (code_chars as f64 / CODE_CHARS_PER_TOKEN as f64).ceil() as usize;
    let prose_tokens = (prose_chars as f64 / PROSE_CHARS_PER_TOKEN as f64).ceil() as usize;
    code_tokens + prose_tokens
}

/// Estimate cost in dollars for a token count.
pub fn estimate_cost(token_count: usize, cost_per_1k_tokens: f64) -> f64 {
    (token_count as f64 / 1000.0) * cost_per_1k_tokens
}

/// Clear the token cache (useful for testing or memory pressure)
pub fn clear_token_cache() {
    let mut cache = TOKEN_CACHE.write();
    if let Some(ref mut c) = *cache {
        c.cache.clear();
    }
}

/// Get cache statistics as (entries, capacity)
pub fn token_cache_stats() -> (usize, usize) {
    let cache = TOKEN_CACHE.read();
    match *cache {
        Some(ref c) => (c.cache.len(), c.max_size),
        None => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_tokens() {
        assert_eq!(approximate_tokens("Hello world"), 2); // 2 * 1.3 = 2.6 -> 2
        assert_eq!(approximate_tokens("The quick brown fox"), 5); // 4 * 1.3 = 5.2 -> 5
        assert_eq!(approximate_tokens(""), 0);
        assert_eq!(approximate_tokens("   "), 0);

        // Punctuation does not create words
        let text = "Hello, world! How are you?";
        assert_eq!(approximate_tokens(text), 6); // 5 * 1.3 = 6.5 -> 6
    }

    #[test]
    fn test_accurate_tokens_nonempty() {
        // Encoder may legitimately be unavailable in minimal environments;
        // when present the count must be positive and cached.
        if let Some(count) = accurate_tokens("Hello, world!") {
            assert!(count > 0);
            assert_eq!(accurate_tokens("Hello, world!"), Some(count));
        }
    }

    #[test]
    fn test_accurate_tokens_empty() {
        assert_eq!(accurate_tokens(""), Some(0));
    }

    #[test]
    fn test_mode_switching() {
        set_accurate_mode(false);
        assert_eq!(counting_mode(), "approximate");
        // In approximation mode count_tokens applies the word heuristic
        let text = "This is a test sentence with several words";
        assert_eq!(count_tokens(text, false), 10); // 8 * 1.3 = 10.4 -> 10
        set_accurate_mode(true);
        assert_eq!(counting_mode(), "accurate");
        set_accurate_mode(false);
        assert_eq!(counting_mode(), "approximate");
    }

    #[test]
    fn test_estimate_markdown_empty() {
        assert_eq!(estimate_markdown(""), 0);
    }

    #[test]
    fn test_estimate_markdown_code_denser() {
        let prose = "word ".repeat(100);
        let code = format!("```dart\n{}\n```", "word ".repeat(100));
        // Same payload, code counts denser per char
        assert!(estimate_markdown(&code) > estimate_markdown(&prose));
    }

    #[test]
    fn test_estimate_markdown_fence_toggling() {
        let text = "prose line\n```dart\ncode line\n```\nmore prose";
        let estimate = estimate_markdown(text);
        assert!(estimate > 0);
        // All-prose version of the same text estimates lower or equal
        let all_prose = "prose line\nxxxxxxx\ncode line\nxxx\nmore prose";
        assert!(estimate >= estimate_markdown(all_prose));
    }

    #[test]
    fn test_estimate_cost() {
        let cost = estimate_cost(1000, 0.002);
        assert!((cost - 0.002).abs() < f64::EPSILON);
        assert!((estimate_cost(500, 0.002) - 0.001).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cache_stats_shape() {
        let (entries, capacity) = token_cache_stats();
        assert!(capacity == 0 || entries <= capacity);
    }
}
