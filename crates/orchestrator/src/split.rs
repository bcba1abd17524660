//! Splitting long replies into transport-sized chunks.

/// Split `text` into chunks of at most `max_len` characters.
///
/// Each cut prefers the last newline within reach, then the last space, and
/// only force-cuts mid-word when neither lands far enough into the chunk
/// (50% of `max_len` for a newline, 30% for a space). The separator at a cut
/// is dropped and the remainder is left-trimmed.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 || text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_len {
        let (chunk, remainder) = cut_once(rest, max_len);
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        rest = remainder.trim_start();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}

/// Cut one chunk off the front of `text`, which is longer than `max_len`.
fn cut_once(text: &str, max_len: usize) -> (&str, &str) {
    // Byte offset just past the character at index `max_len`: a separator
    // there still leaves a chunk of exactly `max_len` characters.
    let window_end = text
        .char_indices()
        .nth(max_len + 1)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let window = &text[..window_end];

    if let Some(cut) = separator_cut(window, '\n', max_len, 0.5) {
        return (&text[..cut], &text[cut..]);
    }
    if let Some(cut) = separator_cut(window, ' ', max_len, 0.3) {
        return (&text[..cut], &text[cut..]);
    }

    let force = text
        .char_indices()
        .nth(max_len)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    (&text[..force], &text[force..])
}

/// Byte offset of the last `separator` in `window`, if it sits at or past
/// `min_ratio` of `max_len` characters.
fn separator_cut(window: &str, separator: char, max_len: usize, min_ratio: f64) -> Option<usize> {
    let cut = window.rfind(separator)?;
    let position = window[..cut].chars().count();
    (position as f64 >= max_len as f64 * min_ratio).then_some(cut)
}
