//! Text cleaning for Todoist's CSV importer

enum Replacement {
    Keep,
    Drop,
    With(&'static str),
}

fn replace_char(c: char, strip_emoji: bool) -> Replacement {
    match c {
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => Replacement::With("\""),
        '\u{2018}' | '\u{2019}' | '\u{201A}' => Replacement::With("'"),
        '\u{2013}' | '\u{2014}' => Replacement::With("-"),
        '\u{2026}' => Replacement::With("..."),
        '\t' | '\u{00A0}' => Replacement::With(" "),
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => Replacement::Drop,
        c if c.is_control() => Replacement::Drop,
        c if strip_emoji && !c.is_ascii() && !c.is_alphanumeric() => Replacement::Drop,
        _ => Replacement::Keep,
    }
}

/// Clean one text field
///
/// Line breaks are normalized, typographic punctuation is replaced by ASCII,
/// invisible and control characters are removed, and internal line breaks
/// are collapsed into `newline_placeholder`. Whitespace runs become a single
/// space and the result is trimmed. Quoting is left to the CSV writer.
pub fn sanitize_text(field: &str, newline_placeholder: &str, strip_emoji: bool) -> String {
    let normalized = field.replace("\r\n", "\n").replace('\r', "\n");

    let mut cleaned = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        if c == '\n' {
            cleaned.push('\n');
            continue;
        }
        match replace_char(c, strip_emoji) {
            Replacement::Keep => cleaned.push(c),
            Replacement::With(replacement) => cleaned.push_str(replacement),
            Replacement::Drop => {}
        }
    }

    cleaned
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(newline_placeholder)
}
