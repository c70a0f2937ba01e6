use crate::backend::TextMeasurer;

/// Split a line into alternating runs of non-whitespace and whitespace. Whitespace runs
/// are kept as their own tokens so that concatenating the tokens gives back the line
/// exactly.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, ch) in line.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&line[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }

    tokens
}

/// Split text into source lines on `\n` or `\r\n`. Empty text has no lines at all.
pub fn source_lines(text: &str) -> impl Iterator<Item = &str> {
    let lines = if text.is_empty() {
        None
    } else {
        Some(text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)))
    };
    lines.into_iter().flatten()
}

/// Word-wrap text so that every line measures at most `available_width` pixels.
///
/// Each source line that already fits is kept verbatim, including any blank lines.
/// Longer lines are greedily filled token by token and broken at whitespace; the
/// broken lines are trimmed. A single word wider than `available_width` is placed on
/// a line by itself and allowed to overflow: words are never split.
///
/// Every overflow flushes the line built so far, even when it trims down to nothing,
/// so an overflowing first word is preceded by a blank line and overflowing trailing
/// whitespace leaves a blank line behind.
pub fn wrap<M: TextMeasurer + ?Sized>(
    text: &str,
    measurer: &M,
    available_width: u32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in source_lines(text) {
        if measurer.measure_width(line) <= available_width {
            lines.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for token in tokenize(line) {
            let candidate = format!("{current}{token}");
            if measurer.measure_width(&candidate) > available_width {
                lines.push(current.trim().to_string());
                current = token.to_string();
            } else {
                current = candidate;
            }
        }

        lines.push(current.trim().to_string());
    }

    lines
}
