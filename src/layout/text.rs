//! Line breaking for cell and paragraph text.

use super::block::WrapMode;

/// Whether `ch` attaches to the preceding character and must not start a line.
fn is_continuation(ch: char) -> bool {
    matches!(ch,
        '\u{0300}'..='\u{036F}'     // combining diacritics
        | '\u{0900}'..='\u{0903}'   // Devanagari signs
        | '\u{093A}'..='\u{094F}'   // Devanagari vowel signs, virama
        | '\u{0951}'..='\u{0957}'
        | '\u{0962}'..='\u{0963}'
        | '\u{0B82}'                // Tamil anusvara
        | '\u{0BBE}'..='\u{0BCD}'   // Tamil vowel signs, virama
        | '\u{0BD7}'
        | '\u{200C}' | '\u{200D}'   // ZWNJ / ZWJ
    )
}

fn is_virama(ch: char) -> bool {
    matches!(ch, '\u{094D}' | '\u{0BCD}')
}

/// Byte offsets at which a line may be broken without splitting a cluster.
///
/// A consonant following a virama stays in the virama's cluster (conjuncts).
pub fn cluster_boundaries(text: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut prev: Option<char> = None;
    for (i, ch) in text.char_indices() {
        let joined = is_continuation(ch) || prev.is_some_and(is_virama);
        if i > 0 && !joined {
            out.push(i);
        }
        prev = Some(ch);
    }
    out
}

/// Wraps `text` into lines no wider than `max_width`, as measured by `measure`.
///
/// A single unit wider than `max_width` is placed on its own line rather than
/// dropped. Explicit newlines always break. An empty text yields one empty line.
pub fn wrap<F>(text: &str, max_width: f32, mode: WrapMode, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        match mode {
            WrapMode::Words => wrap_words(paragraph, max_width, &measure, &mut lines),
            WrapMode::Clusters => wrap_clusters(paragraph, max_width, &measure, &mut lines),
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_words<F: Fn(&str) -> f32>(text: &str, max_width: f32, measure: &F, lines: &mut Vec<String>) {
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if measure(&candidate) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if measure(word) <= max_width {
            line = word.to_string();
        } else {
            // Over-long token (e.g. an email address): break it by cluster.
            let mut pieces = Vec::new();
            wrap_clusters(word, max_width, measure, &mut pieces);
            line = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }
    if !line.is_empty() || text.trim().is_empty() {
        lines.push(line);
    }
}

fn wrap_clusters<F: Fn(&str) -> f32>(text: &str, max_width: f32, measure: &F, lines: &mut Vec<String>) {
    let text = text.trim();
    if text.is_empty() {
        lines.push(String::new());
        return;
    }
    let mut start = 0;
    let mut last_fit: Option<usize> = None;
    let mut boundaries = cluster_boundaries(text);
    boundaries.push(text.len());

    let mut i = 0;
    while i < boundaries.len() {
        let end = boundaries[i];
        if measure(&text[start..end]) <= max_width {
            last_fit = Some(end);
            i += 1;
            continue;
        }
        // At least one cluster per line guarantees progress.
        let cut = last_fit.unwrap_or(end);
        lines.push(text[start..cut].trim_end().to_string());
        start = cut;
        last_fit = None;
        while start < text.len() && text[start..].starts_with(' ') {
            start += 1;
        }
        while i < boundaries.len() && boundaries[i] <= start {
            i += 1;
        }
    }
    if start < text.len() {
        lines.push(text[start..].to_string());
    }
}
