/// Maps a single observed byte to the text shown for it.
///
/// Printable ASCII and the two line characters pass through (the line
/// characters are escaped later by the pane-specific rules). Everything else
/// is shown as `\t` or `\xNN` so no raw control byte ever reaches the
/// terminal.
pub fn byte_to_display(byte: u8) -> String {
    match byte {
        b'\n' | b'\r' | 0x20..=0x7e => char::from(byte).to_string(),
        b'\t' => "\\t".to_string(),
        _ => format!("\\x{byte:02x}"),
    }
}

/// Raw pane rule: each `\n` / `\r` becomes its two-character escape followed
/// by a real line break.
pub fn escape_raw(text: &str) -> String {
    text.replace('\n', "\\n\n").replace('\r', "\\r\n")
}

/// Logging pane rule for whole messages: line characters are escaped inline
/// and the message is terminated by exactly one real newline.
pub fn escape_log(text: &str) -> String {
    let mut escaped = text.replace('\r', "\\r").replace('\n', "\\n");
    escaped.push('\n');
    escaped
}

/// Logging pane rule for streamed bytes. `\r` is escaped inline like in
/// messages; `\n` is the stream's own line terminator and is kept as a break.
pub fn escape_log_byte(byte: u8) -> String {
    match byte {
        b'\r' => "\\r".to_string(),
        _ => byte_to_display(byte),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn printable_bytes_are_shown_as_characters() {
        assert_eq!(byte_to_display(b'A'), "A");
        assert_eq!(byte_to_display(b' '), " ");
        assert_eq!(byte_to_display(b'~'), "~");
    }

    #[test]
    fn other_bytes_are_shown_as_hex() {
        assert_eq!(byte_to_display(0x00), "\\x00");
        assert_eq!(byte_to_display(0x1b), "\\x1b");
        assert_eq!(byte_to_display(0xff), "\\xff");
        assert_eq!(byte_to_display(b'\t'), "\\t");
    }

    #[test]
    fn raw_escaping_breaks_after_line_characters() {
        assert_eq!(escape_raw("AT\r\n"), "AT\\r\n\\n\n");
        assert_eq!(escape_raw("plain"), "plain");
    }

    #[test]
    fn log_escaping_is_inline_with_one_terminator() {
        assert_eq!(escape_log("a\r\nb"), "a\\r\\nb\n");
        assert_eq!(escape_log(""), "\n");
    }

    #[test]
    fn log_byte_escaping_keeps_newline_as_terminator() {
        assert_eq!(escape_log_byte(b'\r'), "\\r");
        assert_eq!(escape_log_byte(b'\n'), "\n");
        assert_eq!(escape_log_byte(b'x'), "x");
    }
}
