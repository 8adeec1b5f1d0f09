/// Calculates the 1-based line and column number for a given byte position in the source text.
/// This function is meant for diagnostics and log lines only, as it scans the text up to
/// `position` every time it is called.
pub fn get_line_and_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in source.char_indices() {
        if i >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// True when `value` is exactly `len` lowercase ASCII letters.
pub fn is_lower_alpha(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_lowercase())
}
