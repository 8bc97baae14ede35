//! Text splitting for length-limited speech endpoints

/// Longest text the Google Translate speech endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

const SENTENCE_END: &[char] = &['.', '!', '?', ';', ':', '…', '。', '！', '？'];
const CLAUSE_END: &[char] = &[',', '、', '，'];

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Whitespace runs are collapsed. Cuts prefer sentence punctuation, then
/// clause punctuation, then spaces; a single word longer than `max_chars` is
/// cut mid-word. Chunks with nothing speakable (punctuation only) are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chunks = Vec::new();
    let mut rest = normalized.as_str();

    while rest.chars().count() > max_chars {
        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];

        let cut = last_boundary(window, SENTENCE_END)
            .or_else(|| last_boundary(window, CLAUSE_END))
            .or_else(|| window.rfind(' ').filter(|&i| i > 0))
            .unwrap_or(window_end);

        let (head, tail) = rest.split_at(cut);
        push_chunk(&mut chunks, head);
        rest = tail.trim_start();
    }

    push_chunk(&mut chunks, rest);
    chunks
}

/// Byte offset just past the last `marks` character in `window`.
fn last_boundary(window: &str, marks: &[char]) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| marks.contains(c))
        .map(|(i, c)| i + c.len_utf8())
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if chunk.chars().any(char::is_alphanumeric) {
        chunks.push(chunk.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(split_text("Hello world", MAX_CHUNK_CHARS), vec!["Hello world"]);
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            split_text("  Hello \n\n  world\t!  ", MAX_CHUNK_CHARS),
            vec!["Hello world !"]
        );
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        let text = "The storm rolled in. Nobody on the ship said a word";
        let chunks = split_text(text, 30);
        assert_eq!(chunks, vec!["The storm rolled in.", "Nobody on the ship said a word"]);
    }

    #[test]
    fn test_clause_then_space_boundary() {
        let chunks = split_text("one two three, four five six", 20);
        assert_eq!(chunks, vec!["one two three,", "four five six"]);

        let chunks = split_text("alpha beta gamma delta", 12);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_long_word_hard_split() {
        let chunks = split_text("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunks_respect_limit() {
        let text = "It was a dark and stormy night; the rain fell in torrents, except at \
                    occasional intervals, when it was checked by a violent gust of wind which \
                    swept up the streets. "
            .repeat(5);

        let chunks = split_text(&text, MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS, "too long: {:?}", chunk);
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }

        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "日本語のテキスト。これは二番目の文です。";
        let chunks = split_text(text, 11);
        assert_eq!(chunks, vec!["日本語のテキスト。", "これは二番目の文です。"]);
    }

    #[test]
    fn test_punctuation_only_dropped() {
        assert!(split_text("... !!! ???", MAX_CHUNK_CHARS).is_empty());
        assert!(split_text("", MAX_CHUNK_CHARS).is_empty());
    }
}
