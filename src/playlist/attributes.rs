//! Attribute-list parsing
//!
//! Extracts `KEY=value` pairs from the parameter part of a directive such as
//! `#EXT-X-KEY:METHOD=AES-128,URI="key.bin"`. Quoted values may contain
//! commas; unquoted values end at the next comma or at the end of the line.

use regex::Regex;
use std::sync::OnceLock;

static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();

fn attribute_regex() -> &'static Regex {
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z0-9_-]+)=("[^"]*"|[^",]+)"#).expect("attribute pattern is valid")
    })
}

/// Ordered `KEY=value` pairs of one directive, quotes stripped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> AttributeList<'a> {
    /// Parse the text following the directive's `:`
    pub fn parse(params: &'a str) -> Self {
        let pairs = attribute_regex()
            .captures_iter(params)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str();
                let raw = caps.get(2)?.as_str();
                Some((key, unquote(raw)))
            })
            .collect();
        Self { pairs }
    }

    /// Value of the first occurrence of `key`
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pairs() {
        let attrs = AttributeList::parse("BANDWIDTH=1280000,RESOLUTION=640x360");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("BANDWIDTH"), Some("1280000"));
        assert_eq!(attrs.get("RESOLUTION"), Some("640x360"));
        assert_eq!(attrs.get("CODECS"), None);
    }

    #[test]
    fn test_quoted_value_keeps_commas() {
        let attrs = AttributeList::parse(
            r#"BANDWIDTH=3193687,CODECS="avc1.64001f,mp4a.40.2",RESOLUTION=1280x720"#,
        );
        assert_eq!(attrs.get("CODECS"), Some("avc1.64001f,mp4a.40.2"));
        assert_eq!(attrs.get("RESOLUTION"), Some("1280x720"));
    }

    #[test]
    fn test_order_is_preserved() {
        let attrs = AttributeList::parse(r#"METHOD=AES-128,URI="k.bin",IV=0x01"#);
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["METHOD", "URI", "IV"]);
    }

    #[test]
    fn test_empty_quoted_and_mixed_case_keys() {
        let attrs = AttributeList::parse(r#"ElapsedTime=12.5,Duration=30,NAME="""#);
        assert_eq!(attrs.get("ElapsedTime"), Some("12.5"));
        assert_eq!(attrs.get("Duration"), Some("30"));
        assert_eq!(attrs.get("NAME"), Some(""));
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert!(AttributeList::parse("no pairs here").is_empty());
        assert!(AttributeList::parse("").is_empty());
    }
}
