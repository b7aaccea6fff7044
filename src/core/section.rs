//! Purpose: Hold the key/value tokens of one named configuration section.
//! Exports: `Section`.
//! Role: Typed accessor surface over an ordered token map; the unit of namespacing.
//! Invariants: Keys are unique and iterate in ascending order.
//! Invariants: Scalar reads substitute the caller default on absence or conversion failure.
//! Invariants: List reads drop malformed elements instead of defaulting or erroring.

use std::collections::BTreeMap;

use crate::core::list;
use crate::core::value::{FromValue, ToValue};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Section {
    name: String,
    tokens: BTreeMap<String, String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: BTreeMap::new(),
        }
    }

    /// Nameless, token-less section used as the shared "no value" sentinel.
    pub const fn empty() -> Self {
        Self {
            name: String::new(),
            tokens: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The stored string for `key`, untyped.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Remove a token. Returns whether it existed.
    pub fn rem(&mut self, key: &str) -> bool {
        self.tokens.remove(key).is_some()
    }

    pub fn get<T: FromValue>(&self, key: &str, default: T) -> T {
        self.get_base(key, default, 10)
    }

    pub fn get_base<T: FromValue>(&self, key: &str, default: T, base: u32) -> T {
        match self.tokens.get(key) {
            Some(raw) => T::from_value(raw, base).unwrap_or(default),
            None => default,
        }
    }

    /// Read through a caller-supplied conversion instead of `FromValue`.
    pub fn get_with<T, F>(&self, key: &str, convert: F, default: T) -> T
    where
        F: FnOnce(&str) -> T,
    {
        match self.tokens.get(key) {
            Some(raw) => convert(raw),
            None => default,
        }
    }

    pub fn get_list<T: FromValue>(&self, key: &str) -> Vec<T> {
        self.get_list_base(key, 10)
    }

    pub fn get_list_base<T: FromValue>(&self, key: &str, base: u32) -> Vec<T> {
        match self.tokens.get(key) {
            Some(raw) => list::decode(raw)
                .iter()
                .filter_map(|item| T::from_value(item, base))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn get_list_with<T, F>(&self, key: &str, convert: F) -> Vec<T>
    where
        F: Fn(&str) -> T,
    {
        match self.tokens.get(key) {
            Some(raw) => list::decode(raw).iter().map(|item| convert(item)).collect(),
            None => Vec::new(),
        }
    }

    pub fn set<T: ToValue>(&mut self, key: impl Into<String>, value: T) -> &str {
        self.set_base(key, value, 10)
    }

    pub fn set_base<T: ToValue>(&mut self, key: impl Into<String>, value: T, base: u32) -> &str {
        let slot = self.tokens.entry(key.into()).or_default();
        *slot = value.to_value(base);
        slot
    }

    pub fn set_list<T: ToValue>(&mut self, key: impl Into<String>, items: &[T]) -> &str {
        self.set_list_base(key, items, 10)
    }

    pub fn set_list_base<T: ToValue>(
        &mut self,
        key: impl Into<String>,
        items: &[T],
        base: u32,
    ) -> &str {
        let rendered: Vec<String> = items.iter().map(|item| item.to_value(base)).collect();
        let slot = self.tokens.entry(key.into()).or_default();
        *slot = list::encode(&rendered);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::Section;

    #[test]
    fn typed_get_returns_default_when_absent_or_malformed() {
        let mut section = Section::new("general");
        section.set("port", "not a number");

        assert_eq!(section.get::<u16>("port", 8080), 8080);
        assert_eq!(section.get::<u16>("missing", 9), 9);

        section.set("port", 443u16);
        assert_eq!(section.get::<u16>("port", 8080), 443);
    }

    #[test]
    fn set_stores_rendered_string() {
        let mut section = Section::new("general");
        assert_eq!(section.set("retries", 3u8), "3");
        assert_eq!(section.set_base("mask", 255u32, 16), "0xff");
        assert_eq!(section.raw("mask"), Some("0xff"));
        assert_eq!(section.get_base::<u32>("mask", 0, 16), 255);
    }

    #[test]
    fn get_with_uses_caller_conversion() {
        let mut section = Section::new("general");
        section.set("greeting", "hello");

        let upper = section.get_with("greeting", |raw| raw.to_uppercase(), String::new());
        assert_eq!(upper, "HELLO");
        let fallback = section.get_with("missing", |raw| raw.to_uppercase(), "none".to_string());
        assert_eq!(fallback, "none");
    }

    #[test]
    fn list_round_trip_preserves_embedded_separators() {
        let mut section = Section::new("general");
        let items = vec!["a,b".to_string(), "c".to_string()];
        section.set_list("k", &items);
        assert_eq!(section.get_list::<String>("k"), items);
    }

    #[test]
    fn malformed_list_elements_are_dropped() {
        let mut section = Section::new("general");
        section.set("nums", "1,oops,3");
        assert_eq!(section.get_list::<i32>("nums"), vec![1, 3]);
    }

    #[test]
    fn numeric_list_respects_base() {
        let mut section = Section::new("general");
        section.set_list_base("masks", &[255u32, 16u32], 16);
        assert_eq!(section.raw("masks"), Some("0xff,0x10"));
        assert_eq!(section.get_list_base::<u32>("masks", 16), vec![255, 16]);
    }

    #[test]
    fn get_list_with_maps_every_element() {
        let mut section = Section::new("general");
        section.set("names", "ada,grace");
        let lens = section.get_list_with("names", str::len);
        assert_eq!(lens, vec![3, 5]);
    }

    #[test]
    fn rem_reports_existence() {
        let mut section = Section::new("general");
        section.set("key", "value");
        assert!(section.rem("key"));
        assert!(!section.rem("key"));
        assert!(section.is_empty());
    }

    #[test]
    fn iteration_is_key_ordered() {
        let mut section = Section::new("general");
        section.set("b", "2");
        section.set("a", "1");
        section.set("c", "3");
        let keys: Vec<&str> = section.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
