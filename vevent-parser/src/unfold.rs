//! Line unfolding
//!
//! A physical line starting with a single space or tab continues the line
//! before it. Unfolding joins such lines back into logical lines.

/// Characters that end a physical line (`\r\n` counts as one terminator)
const LINE_TERMINATORS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split text into physical lines on any line terminator
///
/// A trailing terminator does not produce an empty last line.
pub fn physical_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some((pos, terminator)) = rest.char_indices().find(|(_, c)| LINE_TERMINATORS.contains(c))
        else {
            lines.push(rest);
            break;
        };

        lines.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") {
            2
        } else {
            terminator.len_utf8()
        };
        rest = &rest[pos + skip..];
    }

    lines
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Join continuation lines onto the line they continue
///
/// Lines are walked from last to first. Continuation tails are collected until
/// the line they belong to is reached, so chains of continuations fold onto
/// the original line in order. A continuation in the very first position has
/// nothing to attach to and is left as it is.
pub fn unfold(raw: &str) -> String {
    let lines = physical_lines(raw);
    let mut logical: Vec<String> = Vec::with_capacity(lines.len());
    let mut tails: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate().rev() {
        if i > 0 && is_continuation(line) {
            tails.push(&line[1..]);
            continue;
        }

        let mut joined = String::from(*line);
        for tail in tails.drain(..).rev() {
            joined.push_str(tail);
        }
        logical.push(joined);
    }

    if logical.len() < lines.len() {
        log::trace!("Unfolded {} physical lines into {}", lines.len(), logical.len());
    }

    logical.reverse();
    logical.join("\n")
}
