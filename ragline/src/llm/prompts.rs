//! Prompt assembly for grounded question answering.
//!
//! Retrieved chunks are numbered and packed into a context block that must
//! fit the model's window once the reserved budgets are taken out. Token
//! counts are estimated at a fixed characters-per-token ratio.

use crate::config::LlmConfig;
use crate::models::RetrievedChunk;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question based on the provided context. If the context doesn't contain enough information, say so clearly.";

pub const CHARS_PER_TOKEN: usize = 4;

/// Tokens reserved for the system prompt.
pub const SYSTEM_PROMPT_BUDGET: usize = 200;

/// Tokens reserved for the question and prompt scaffolding.
pub const QUESTION_BUDGET: usize = 300;

/// A chunk that does not fit is truncated only when more than this many
/// characters of room remain.
pub const MIN_TRUNCATED_CHARS: usize = 200;

const ENTRY_SEPARATOR: &str = "\n\n";
const TRUNCATION_MARKER: char = '…';

/// Character budget for the context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBudget {
    pub max_context_chars: usize,
}

impl PromptBudget {
    pub fn new(context_window: usize, max_new_tokens: usize) -> Self {
        let context_tokens = context_window
            .saturating_sub(max_new_tokens)
            .saturating_sub(SYSTEM_PROMPT_BUDGET)
            .saturating_sub(QUESTION_BUDGET);

        Self {
            max_context_chars: context_tokens * CHARS_PER_TOKEN,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.context_window, config.max_tokens as usize)
    }
}

/// The context block and how many chunks contributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedContext {
    pub block: String,
    pub chunks_used: usize,
}

pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Packs `[i] content` entries in retrieval order until the budget runs out.
///
/// The first entry that does not fit is cut down and marked with an ellipsis
/// when enough room remains; nothing after it is included. The resulting
/// block never exceeds `max_chars` characters.
pub fn fit_context(chunks: &[RetrievedChunk], max_chars: usize) -> FittedContext {
    let separator_len = ENTRY_SEPARATOR.chars().count();
    let mut fitted: Vec<String> = Vec::with_capacity(chunks.len());
    let mut total = 0usize;

    for (i, chunk) in chunks.iter().enumerate() {
        let entry = format!("[{}] {}", i + 1, chunk.content);
        let entry_len = entry.chars().count();

        if total + entry_len > max_chars {
            let remaining = max_chars.saturating_sub(total);
            if remaining > MIN_TRUNCATED_CHARS {
                let mut truncated: String = entry.chars().take(remaining - 1).collect();
                truncated.push(TRUNCATION_MARKER);
                fitted.push(truncated);
            }
            break;
        }

        fitted.push(entry);
        total += entry_len + separator_len;
    }

    FittedContext {
        chunks_used: fitted.len(),
        block: fitted.join(ENTRY_SEPARATOR),
    }
}

/// Builds the user message sent alongside [`SYSTEM_PROMPT`].
pub fn build_prompt(chunks: &[RetrievedChunk], question: &str, budget: PromptBudget) -> String {
    let context = fit_context(chunks, budget.max_context_chars);

    tracing::info!(
        chunks_used = context.chunks_used,
        chunks_retrieved = chunks.len(),
        context_chars = context.block.chars().count(),
        estimated_tokens = estimate_tokens(&context.block),
        "Built answer prompt"
    );

    format!("Context:\n{}\n\nQuestion:\n{}", context.block, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(content: &str) -> RetrievedChunk {
        RetrievedChunk::new(content, 0.9, None)
    }

    #[test]
    fn test_default_budget() {
        let budget = PromptBudget::new(32_769, 2048);
        assert_eq!(budget.max_context_chars, 120_884);

        let from_config =
            PromptBudget::from_config(&LlmConfig::new("http://llm", "model", "key"));
        assert_eq!(from_config, budget);
    }

    #[test]
    fn test_budget_saturates_at_zero() {
        assert_eq!(PromptBudget::new(1000, 2048).max_context_chars, 0);
    }

    #[test]
    fn test_entries_are_numbered_in_order() {
        let chunks = vec![chunk("The sky is blue."), chunk("Grass is green.")];
        let context = fit_context(&chunks, 10_000);

        assert_eq!(context.chunks_used, 2);
        assert_eq!(context.block, "[1] The sky is blue.\n\n[2] Grass is green.");
    }

    #[test]
    fn test_prompt_layout() {
        let chunks = vec![chunk("The sky is blue.")];
        let prompt = build_prompt(
            &chunks,
            "What color is the sky?",
            PromptBudget::new(32_769, 2048),
        );

        assert_eq!(
            prompt,
            "Context:\n[1] The sky is blue.\n\nQuestion:\nWhat color is the sky?"
        );
    }

    #[test]
    fn test_overflowing_chunk_is_truncated_with_marker() {
        let chunks = vec![chunk(&"a".repeat(100)), chunk(&"b".repeat(1000))];
        let context = fit_context(&chunks, 500);

        assert_eq!(context.chunks_used, 2);
        assert!(context.block.ends_with('…'));
        assert_eq!(context.block.chars().count(), 500);
        assert!(context.block.starts_with("[1] aaaa"));
        assert!(context.block.contains("\n\n[2] bbbb"));
    }

    #[test]
    fn test_small_remainder_is_dropped() {
        // 104 chars for the first entry + 2 for the separator leaves 44.
        let chunks = vec![chunk(&"a".repeat(100)), chunk(&"b".repeat(1000))];
        let context = fit_context(&chunks, 150);

        assert_eq!(context.chunks_used, 1);
        assert_eq!(context.block, format!("[1] {}", "a".repeat(100)));
    }

    #[test]
    fn test_nothing_after_truncation_point() {
        let chunks = vec![
            chunk(&"a".repeat(400)),
            chunk(&"b".repeat(400)),
            chunk("short"),
        ];
        let context = fit_context(&chunks, 700);

        assert_eq!(context.chunks_used, 2);
        assert!(!context.block.contains("short"));
    }

    #[test]
    fn test_block_never_exceeds_budget() {
        let chunks: Vec<RetrievedChunk> = (0..20)
            .map(|i| chunk(&"x".repeat(50 + i * 37)))
            .collect();

        for max in [0, 1, 50, 201, 250, 999, 2500, 10_000] {
            let context = fit_context(&chunks, max);
            assert!(
                context.block.chars().count() <= max,
                "block of {} chars exceeds {max}",
                context.block.chars().count()
            );
        }
    }

    #[test]
    fn test_multibyte_content_is_counted_in_chars() {
        let chunks = vec![chunk(&"é".repeat(600))];
        let context = fit_context(&chunks, 300);

        assert_eq!(context.block.chars().count(), 300);
        assert!(context.block.ends_with('…'));
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
