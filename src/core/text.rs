//! Purpose: Parse and serialize one configuration tier in the on-disk line format.
//! Exports: `TierMap`, `parse`, `write`.
//! Role: Codec boundary between readers/writers and the section maps; owns no state.
//! Invariants: Parsing is lenient: lines without `=` and values that trim to empty are skipped.
//! Invariants: Serialization emits section headers lazily and an unconditional blank line per block.
//! Invariants: Sections and tokens serialize in ascending name/key order.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use crate::core::error::Error;
use crate::core::section::Section;
use crate::core::trim::trim;

/// One tier's worth of sections, keyed by section name.
pub type TierMap = BTreeMap<String, Section>;

/// Read `reader` line by line into `tier`. Key/value lines seen before the
/// first `[name]` header land in `unnamed`.
pub fn parse<R: BufRead>(tier: &mut TierMap, unnamed: &mut Section, reader: R) -> Result<(), Error> {
    let mut current: Option<String> = None;

    for line in reader.lines() {
        let line = line.map_err(Error::from_io)?;
        let line = trim(&line);

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
            let name = &line[1..line.len() - 1];
            tier.entry(name.to_string())
                .or_insert_with(|| Section::new(name));
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = trim(key);
        let value = trim(value);
        if value.is_empty() {
            continue;
        }

        match &current {
            Some(name) => {
                if let Some(section) = tier.get_mut(name) {
                    section.set(key, value);
                }
            }
            None => {
                unnamed.set(key, value);
            }
        }
    }

    Ok(())
}

/// Serialize `tier` to `writer`. Empty-valued tokens are skipped and a
/// section whose tokens are all empty produces no header, only its
/// terminating blank line.
pub fn write<W: Write>(tier: &TierMap, mut writer: W) -> Result<(), Error> {
    for (name, section) in tier {
        let mut wrote_header = false;
        for (key, value) in section.iter() {
            if value.is_empty() {
                continue;
            }
            if !wrote_header {
                writeln!(writer, "[{name}]").map_err(Error::from_io)?;
                wrote_header = true;
            }
            writeln!(writer, "{key} = {value}").map_err(Error::from_io)?;
        }
        writeln!(writer).map_err(Error::from_io)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse, write, TierMap};
    use crate::core::section::Section;

    fn parse_str(input: &str) -> (TierMap, Section) {
        let mut tier = TierMap::new();
        let mut unnamed = Section::empty();
        parse(&mut tier, &mut unnamed, input.as_bytes()).expect("parse");
        (tier, unnamed)
    }

    fn write_str(tier: &TierMap) -> String {
        let mut out = Vec::new();
        write(tier, &mut out).expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn sections_and_tokens_parse() {
        let (tier, _) = parse_str("[server]\nhost = example.org\nport = 8080\n");
        let server = tier.get("server").expect("section");
        assert_eq!(server.raw("host"), Some("example.org"));
        assert_eq!(server.raw("port"), Some("8080"));
    }

    #[test]
    fn keys_before_any_header_go_to_the_unnamed_bucket() {
        let (tier, unnamed) = parse_str("stray = 1\n[server]\nhost = h\n");
        assert!(tier.get("server").is_some());
        assert_eq!(unnamed.raw("stray"), Some("1"));
    }

    #[test]
    fn value_splits_at_first_equals_only() {
        let (tier, _) = parse_str("[s]\nexpr = a=b=c\n");
        assert_eq!(tier.get("s").expect("s").raw("expr"), Some("a=b=c"));
    }

    #[test]
    fn lines_without_equals_are_skipped() {
        let (tier, unnamed) = parse_str("[s]\njust words\nkey = value\n");
        assert_eq!(tier.get("s").expect("s").len(), 1);
        assert!(unnamed.is_empty());
    }

    #[test]
    fn empty_values_are_not_stored() {
        let (tier, _) = parse_str("[s]\nkey = \nother = kept\n");
        let section = tier.get("s").expect("s");
        assert_eq!(section.raw("key"), None);
        assert_eq!(section.raw("other"), Some("kept"));
    }

    #[test]
    fn whitespace_around_keys_and_values_is_trimmed() {
        let (tier, _) = parse_str("[s]\n  key\t =  value with spaces  \n");
        assert_eq!(
            tier.get("s").expect("s").raw("key"),
            Some("value with spaces")
        );
    }

    #[test]
    fn reopening_a_section_merges_tokens() {
        let (tier, _) = parse_str("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n");
        let a = tier.get("a").expect("a");
        assert_eq!(a.raw("x"), Some("1"));
        assert_eq!(a.raw("z"), Some("3"));
    }

    #[test]
    fn empty_section_serializes_to_blank_line_only() {
        let (tier, _) = parse_str("[guildA]\nfoo = bar\n\n[guildB]\nfoo = \n\n");
        assert_eq!(write_str(&tier), "[guildA]\nfoo = bar\n\n\n");
    }

    #[test]
    fn serialization_orders_sections_by_name() {
        let (tier, _) = parse_str("[zeta]\nk = 1\n[alpha]\nk = 2\n");
        assert_eq!(write_str(&tier), "[alpha]\nk = 2\n\n[zeta]\nk = 1\n\n");
    }

    #[test]
    fn parse_write_round_trip_is_stable() {
        let input = "[a]\nkey = value\nkey2 = value2\n\n[b]\nkey = value\n\n";
        let (tier, _) = parse_str(input);
        let first = write_str(&tier);
        assert_eq!(first, input);
        let (reparsed, _) = parse_str(&first);
        assert_eq!(write_str(&reparsed), first);
    }

    #[test]
    fn crlf_input_parses_cleanly() {
        let (tier, _) = parse_str("[s]\r\nkey = value\r\n");
        assert_eq!(tier.get("s").expect("s").raw("key"), Some("value"));
    }
}
