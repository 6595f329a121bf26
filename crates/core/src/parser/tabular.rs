/// Splits delimited text into rows of fields.
///
/// Single pass with a quoted-field flag. Outside quotes a `,` ends the field
/// and `\n`, `\r\n`, or a bare `\r` ends the row; a `"` opens quote mode.
/// Inside quotes a doubled `""` decodes to one literal quote and everything
/// else, commas and newlines included, accumulates literally. End of input
/// flushes any pending field and row. Malformed quoting degrades gracefully;
/// this never fails.
#[must_use]
pub fn parse_rows(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut field)),
                '\n' | '\r' => {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
