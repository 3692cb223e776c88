//! Model name mapping from Claude aliases to backend models.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Static mapping from Claude model names to v1internal backend models.
static CLAUDE_TO_GEMINI: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("claude-opus-4-5-thinking", "claude-opus-4-5-thinking"),
        ("claude-opus-4-5", "claude-opus-4-5-thinking"),
        ("claude-opus-4-5-20251101", "claude-opus-4-5-thinking"),
        ("claude-opus-4", "claude-opus-4-5-thinking"),
        ("claude-sonnet-4-5", "claude-sonnet-4-5"),
        ("claude-sonnet-4-5-thinking", "claude-sonnet-4-5-thinking"),
        ("claude-sonnet-4-5-20250929", "claude-sonnet-4-5"),
        ("claude-3-5-sonnet-20241022", "claude-sonnet-4-5"),
        ("claude-3-5-sonnet-20240620", "claude-sonnet-4-5"),
        ("claude-haiku-4", "gemini-3-flash"),
        ("claude-haiku-4-5", "gemini-3-flash"),
        ("claude-3-haiku-20240307", "gemini-3-flash"),
        ("claude-haiku-4-5-20251001", "gemini-3-flash"),
    ])
});

/// Maps a Claude alias to its backend model. Unknown names pass through unchanged.
#[must_use]
pub fn map_claude_model_to_gemini(input: &str) -> String {
    CLAUDE_TO_GEMINI.get(input).map_or_else(|| input.to_owned(), |mapped| (*mapped).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haiku_family_maps_to_flash() {
        assert_eq!(map_claude_model_to_gemini("claude-haiku-4"), "gemini-3-flash");
        assert_eq!(map_claude_model_to_gemini("claude-3-haiku-20240307"), "gemini-3-flash");
        assert_eq!(map_claude_model_to_gemini("claude-haiku-4-5-20251001"), "gemini-3-flash");
    }

    #[test]
    fn test_unknown_model_passes_through() {
        assert_eq!(map_claude_model_to_gemini("gemini-3-pro-high"), "gemini-3-pro-high");
        assert_eq!(map_claude_model_to_gemini("my-custom-model"), "my-custom-model");
    }
}
