//! Fragment splicing
//!
//! Fragments are written immediately before the marker line, so the marker
//! stays last and keeps collecting later insertions in call order. The marker
//! line itself and everything else in the file are copied through untouched.

use crate::locator::MarkerPosition;

/// Splice `fragment` into `text` right before the marker at `position`
///
/// With `auto_indent`, the fragment is dedented by the smallest indentation of
/// its non-blank lines and re-indented with the marker's indentation. Blank
/// lines stay empty. Trailing whitespace of the fragment is dropped and every
/// inserted line ends with the marker line's terminator.
#[must_use]
pub fn insert_before(text: &str, position: &MarkerPosition, fragment: &str, auto_indent: bool) -> String {
    let block = format_block(fragment, position, auto_indent);

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..position.offset]);
    out.push_str(&block);
    out.push_str(&text[position.offset..]);
    out
}

/// The exact text [`insert_before`] would splice in
#[must_use]
pub fn format_block(fragment: &str, position: &MarkerPosition, auto_indent: bool) -> String {
    let lines: Vec<&str> = fragment
        .trim_end()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let dedent = if auto_indent {
        lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start().len())
            .min()
            .unwrap_or(0)
    } else {
        0
    };

    let mut block = String::with_capacity(fragment.len() + lines.len() * position.indent.len());
    for line in lines {
        if line.trim().is_empty() {
            if !auto_indent {
                block.push_str(line);
            }
        } else if auto_indent {
            block.push_str(&position.indent);
            block.push_str(line.get(dedent..).unwrap_or_else(|| line.trim_start()));
        } else {
            block.push_str(line);
        }
        block.push_str(position.line_ending);
    }
    block
}
