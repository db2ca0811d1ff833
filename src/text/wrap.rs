//! Character-budget word wrapping for caption lines.

/// Bullet marker recognized at the start of a caption.
pub const BULLET: char = '•';

/// Indent applied to continuation lines of a bulleted caption.
pub const CONTINUATION_INDENT: &str = "   ";

/// Extra character budget granted to non-bulleted (heading style) captions.
pub const PLAIN_EXTRA_BUDGET: usize = 5;

/// Wrap `text` into lines under a character budget.
///
/// Bulleted text (`"• ..."`) is wrapped at `char_limit` with continuation lines indented by
/// [`CONTINUATION_INDENT`]; the indent counts against the line budget. Any other text is
/// wrapped at `char_limit + PLAIN_EXTRA_BUDGET`. Lines only break at whitespace: a word longer
/// than the budget is kept whole on its own line.
pub fn wrap(text: &str, char_limit: usize) -> Vec<String> {
    let text = text.trim();
    match text.strip_prefix(BULLET) {
        Some(rest) => {
            let mut lines = fill(rest.trim(), char_limit, CONTINUATION_INDENT);
            lines[0] = format!("{BULLET} {}", lines[0]);
            lines
        }
        None => fill(text, char_limit + PLAIN_EXTRA_BUDGET, ""),
    }
}

/// Greedy fill. Always returns at least one (possibly empty) line.
fn fill(text: &str, width: usize, subsequent_indent: &str) -> Vec<String> {
    let indent_len = subsequent_indent.chars().count();
    let mut lines = Vec::<String>::new();
    let mut line = String::new();
    let mut line_len = 0usize;
    let mut has_word = false;

    for (gap, word) in words_with_gaps(text) {
        let word_len = word.chars().count();
        if !has_word {
            line.push_str(word);
            line_len = word_len;
            has_word = true;
            continue;
        }

        let gap_len = gap.chars().count();
        if line_len + gap_len + word_len <= width {
            line.extend(gap.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            line.push_str(word);
            line_len += gap_len + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(subsequent_indent);
            line.push_str(word);
            line_len = indent_len + word_len;
        }
    }

    lines.push(line);
    lines
}

/// Split into `(preceding whitespace, word)` pairs. The first gap is empty for trimmed input.
fn words_with_gaps(text: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let word_start = rest.find(|c: char| !c.is_whitespace())?;
        let (gap, tail) = rest.split_at(word_start);
        let word_end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let (word, remaining) = tail.split_at(word_end);
        rest = remaining;
        Some((gap, word))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
