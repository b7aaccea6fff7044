// Whitespace trimming shared by the text and list codecs.
//
// Leading trim is stricter than trailing trim on purpose: the head of a line
// may carry control characters (a BOM, stray carriage returns from foreign
// editors) that must not survive into keys or section names, so the left
// side strips every ASCII character that is not printable-non-space, plus a
// leading BOM. The right side strips whitespace only.

pub fn ltrim(s: &str) -> &str {
    s.trim_start_matches(|ch: char| (ch.is_ascii() && !ch.is_ascii_graphic()) || ch == '\u{feff}')
}

pub fn rtrim(s: &str) -> &str {
    s.trim_end_matches(char::is_whitespace)
}

pub fn trim(s: &str) -> &str {
    rtrim(ltrim(s))
}

#[cfg(test)]
mod tests {
    use super::trim;

    #[test]
    fn trims_plain_whitespace() {
        assert_eq!(trim("  key \t"), "key");
        assert_eq!(trim("value"), "value");
        assert_eq!(trim(""), "");
        assert_eq!(trim("   \t  "), "");
    }

    #[test]
    fn leading_control_characters_are_stripped() {
        assert_eq!(trim("\u{feff}[general]"), "[general]");
        assert_eq!(trim("\r\x01key"), "key");
        assert_eq!(trim("\x7fkey"), "key");
    }

    #[test]
    fn interior_whitespace_survives() {
        assert_eq!(trim("  hello world  "), "hello world");
    }

    #[test]
    fn non_ascii_is_preserved_at_the_head() {
        assert_eq!(trim("  éclair "), "éclair");
    }
}
