//! Text helpers for log and console output

const ELLIPSIS: &str = "...";

/// Cut `text` to at most `max_bytes` bytes, ending in `...` when shortened.
///
/// The cut never splits a UTF-8 character. Used to keep free-text vote
/// reasons bounded in decision logs.
pub fn truncate(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let budget = max_bytes.saturating_sub(ELLIPSIS.len());
    let cut = text
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|end| *end <= budget)
        .last()
        .unwrap_or(0);
    format!("{}{ELLIPSIS}", &text[..cut])
}
