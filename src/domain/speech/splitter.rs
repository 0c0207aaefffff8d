use super::normalizer::normalize;
use regex::Regex;
use std::sync::LazyLock;

/// A sentence is a run of text closed by terminal punctuation, or the trailing
/// remainder of the text when it has none.
static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]*[.!?]+|[^.!?]+$").expect("valid sentence pattern"));

/// Split text into chunks that the synthesizer can handle in one request.
///
/// Text is normalized first. When the result already fits in `max_len`
/// characters it is returned as a single chunk. Otherwise sentences are packed
/// greedily, joined by a single space, and a chunk is closed as soon as the next
/// sentence would push it past `max_len`. A sentence that is longer than
/// `max_len` on its own is sliced at fixed width.
///
/// Lengths are measured in characters. No returned chunk is empty.
pub fn split_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    split_normalized(&normalize(text), max_len)
}

/// Same as [`split_into_chunks`] for text that has already been normalized.
///
/// `normalize` is not idempotent (`"- - item"` loses one bullet per pass), so
/// callers holding normalized text must not run it through a second time.
pub fn split_normalized(normalized: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);

    if normalized.is_empty() {
        return Vec::new();
    }

    if char_len(normalized) <= max_len {
        return vec![normalized.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    let mut current_len = 0;

    for sentence in SENTENCE_PATTERN.find_iter(normalized) {
        for piece in slice_fixed_width(sentence.as_str().trim(), max_len) {
            let piece_len = char_len(&piece);

            if current_len == 0 {
                current_chunk = piece;
                current_len = piece_len;
            } else if current_len + 1 + piece_len <= max_len {
                current_chunk.push(' ');
                current_chunk.push_str(&piece);
                current_len += 1 + piece_len;
            } else {
                chunks.push(std::mem::replace(&mut current_chunk, piece));
                current_len = piece_len;
            }
        }
    }

    if !current_chunk.trim().is_empty() {
        chunks.push(current_chunk);
    }

    // Sentence matching found nothing usable; fall back to plain slicing.
    if chunks.is_empty() {
        return slice_fixed_width(normalized, max_len);
    }

    chunks
}

/// Cut text into windows of exactly `max_len` characters, trimming each and
/// dropping the ones left empty.
fn slice_fixed_width(text: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_len.max(1))
        .map(|window| window.iter().collect::<String>().trim().to_string())
        .filter(|slice| !slice.is_empty())
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
