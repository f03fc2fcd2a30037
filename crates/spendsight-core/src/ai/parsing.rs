//! Response parsing helpers for AI backend output
//!
//! Models usually wrap the requested HTML in a Markdown code fence, sometimes
//! with chatter around it. Only the first fenced block is kept.

use std::sync::OnceLock;

use regex::Regex;

/// First fenced block, optional language tag, optional newline after the fence
const CODE_FENCE_PATTERN: &str = r"```(?:\w+)?\n?([\s\S]*?)```";

fn code_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CODE_FENCE_PATTERN).expect("valid regex"))
}

/// Extract the first fenced code block, trimmed
///
/// Falls back to the whole response trimmed when there is no complete fence.
/// The result may be empty (e.g. an empty fence or a blank response); callers
/// treat that as an empty document rather than an error.
pub fn extract_code_block(response: &str) -> String {
    match code_fence().captures(response).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => response.trim().to_string(),
    }
}
