//! Plain-text excerpt derivation from markdown content.

/// Reduce markdown content to a single-line plain-text summary.
///
/// Heading and quote markers, emphasis markers and inline-code backticks are
/// dropped. Links keep their text, images disappear entirely. Whitespace
/// runs collapse to single spaces. Results longer than `max_chars` are cut
/// there and get `"..."` appended, so the output never exceeds
/// `max_chars + 3` characters. Content with no usable text yields an empty
/// string.
pub fn extract_excerpt(content: &str, max_chars: usize) -> String {
    let mut stripped = String::with_capacity(content.len());
    for line in content.lines() {
        // heading and quote markers only count at the start of a line
        let line = line.trim_start().trim_start_matches(['#', '>']);
        if !stripped.is_empty() {
            stripped.push(' ');
        }
        strip_inline(line, &mut stripped);
    }

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

/// Copy one line into `out` minus inline markdown syntax.
fn strip_inline(line: &str, out: &mut String) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' | '_' | '`' => i += 1,
            '!' if chars.get(i + 1) == Some(&'[') => {
                i = skip_image(&chars, i + 1);
            }
            '[' => match find_char(&chars, i + 1, ']') {
                Some(end) => {
                    out.extend(&chars[i + 1..end]);
                    i = skip_link_target(&chars, end);
                }
                // unbalanced bracket, keep it literal
                None => {
                    out.push('[');
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
}

/// Skip `[alt](target)` starting at the opening bracket, dropping all of it.
fn skip_image(chars: &[char], open: usize) -> usize {
    match find_char(chars, open + 1, ']') {
        Some(end) => skip_link_target(chars, end),
        None => open + 1,
    }
}

/// Advance past an optional `(target)` that follows a closing bracket.
fn skip_link_target(chars: &[char], closing_bracket: usize) -> usize {
    if chars.get(closing_bracket + 1) == Some(&'(') {
        match find_char(chars, closing_bracket + 2, ')') {
            Some(close) => close + 1,
            None => closing_bracket + 1,
        }
    } else {
        closing_bracket + 1
    }
}

fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
    if from >= chars.len() {
        return None;
    }
    chars[from..]
        .iter()
        .position(|&c| c == needle)
        .map(|pos| from + pos)
}
