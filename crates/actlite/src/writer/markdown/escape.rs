pub(super) fn escape_markdown_text(text: &str, escape_special_chars: bool) -> String {
    if !escape_special_chars || text.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '*' => out.push_str("\\*"),
            '_' => out.push_str("\\_"),
            '`' => out.push_str("\\`"),
            '[' => out.push_str("\\["),
            ']' => out.push_str("\\]"),
            '<' => out.push_str("\\<"),
            '>' => out.push_str("\\>"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a cell of a pipe table, which must stay on one line.
pub(super) fn escape_table_cell(text: &str, escape_special_chars: bool) -> String {
    let flat = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    escape_markdown_text(&flat, escape_special_chars).replace('|', "\\|")
}

/// Escapes plain text and turns its line breaks into hard breaks.
pub(super) fn escape_lines(text: &str, escape_special_chars: bool) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = escape_markdown_text(line, escape_special_chars);
            if escape_special_chars {
                escape_line_start(&line)
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\\\n")
}

/// Escapes block syntax at the start of a line: ATX headings, bullet and
/// ordered list markers, setext underlines.
pub(super) fn escape_line_start(line: &str) -> String {
    let (lead, rest) = line.split_at(line.len() - line.trim_start().len());
    if rest.starts_with(['#', '-', '+', '=']) {
        return format!("{lead}\\{rest}");
    }

    // Ordered list markers have at most nine digits.
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if (1..=9).contains(&digits) && rest[digits..].starts_with(['.', ')']) {
        return format!("{lead}{}\\{}", &rest[..digits], &rest[digits..]);
    }
    line.to_string()
}
