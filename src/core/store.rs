//! Purpose: Resolve settings through two overlay tiers of sections, local over global.
//! Exports: `Config`, `Tier`.
//! Role: The application-facing store; owns both tier maps and the file helpers.
//! Invariants: Every read prefers the local tier; writes go to an explicit destination.
//! Invariants: Lazy creation lands in the local tier unless a destination says otherwise.
//! Invariants: No stream or path is retained past the call that received it.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::warn;

use crate::core::error::Error;
use crate::core::section::Section;
use crate::core::text::{self, TierMap};
use crate::core::value::{FromValue, ToValue};

/// Destination tier for explicit writes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Local,
    Global,
}

static NO_SECTION: Section = Section::empty();

/// A layered configuration store: an independent local and global tier plus
/// the shared bucket for tokens parsed before any section header.
#[derive(Debug, Default)]
pub struct Config {
    local: TierMap,
    global: TierMap,
    unnamed: Section,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single reader as the local tier.
    pub fn from_reader<R: BufRead>(local: R) -> Result<Self, Error> {
        let mut config = Self::new();
        text::parse(&mut config.local, &mut config.unnamed, local)?;
        Ok(config)
    }

    /// Parse two readers, global first, then local.
    pub fn from_readers<R: BufRead, S: BufRead>(local: R, global: S) -> Result<Self, Error> {
        let mut config = Self::new();
        text::parse(&mut config.global, &mut config.unnamed, global)?;
        text::parse(&mut config.local, &mut config.unnamed, local)?;
        Ok(config)
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.global.is_empty()
    }

    /// Count of unique section names across both tiers.
    pub fn len(&self) -> usize {
        self.names().len()
    }

    /// Deduplicated union of section names across both tiers, ordered.
    pub fn names(&self) -> BTreeSet<String> {
        self.local
            .keys()
            .chain(self.global.keys())
            .cloned()
            .collect()
    }

    /// Tokens parsed before the first section header.
    pub fn unnamed(&self) -> &Section {
        &self.unnamed
    }

    /// Read-only lookup: local tier first, then global, then a shared empty
    /// sentinel. Never creates anything.
    pub fn section(&self, name: &str) -> &Section {
        self.local
            .get(name)
            .or_else(|| self.global.get(name))
            .unwrap_or(&NO_SECTION)
    }

    /// Mutable lookup with the same precedence; a name absent from both
    /// tiers is created in the local tier.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        if self.local.contains_key(name) || !self.global.contains_key(name) {
            self.local
                .entry(name.to_string())
                .or_insert_with(|| Section::new(name))
        } else {
            self.global
                .entry(name.to_string())
                .or_insert_with(|| Section::new(name))
        }
    }

    /// Create (or fetch) a section in an explicit tier.
    pub fn emplace(&mut self, name: &str, tier: Tier) -> &mut Section {
        let map = match tier {
            Tier::Local => &mut self.local,
            Tier::Global => &mut self.global,
        };
        map.entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    pub fn get<T: FromValue>(&self, section: &str, key: &str, default: T) -> T {
        self.section(section).get(key, default)
    }

    pub fn get_base<T: FromValue>(&self, section: &str, key: &str, default: T, base: u32) -> T {
        self.section(section).get_base(key, default, base)
    }

    pub fn get_with<T, F>(&self, section: &str, key: &str, convert: F, default: T) -> T
    where
        F: FnOnce(&str) -> T,
    {
        self.section(section).get_with(key, convert, default)
    }

    pub fn get_list<T: FromValue>(&self, section: &str, key: &str) -> Vec<T> {
        self.section(section).get_list(key)
    }

    pub fn get_list_base<T: FromValue>(&self, section: &str, key: &str, base: u32) -> Vec<T> {
        self.section(section).get_list_base(key, base)
    }

    pub fn get_list_with<T, F>(&self, section: &str, key: &str, convert: F) -> Vec<T>
    where
        F: Fn(&str) -> T,
    {
        self.section(section).get_list_with(key, convert)
    }

    pub fn set<T: ToValue>(&mut self, section: &str, key: &str, value: T, tier: Tier) -> &str {
        self.emplace(section, tier).set(key, value)
    }

    pub fn set_base<T: ToValue>(
        &mut self,
        section: &str,
        key: &str,
        value: T,
        tier: Tier,
        base: u32,
    ) -> &str {
        self.emplace(section, tier).set_base(key, value, base)
    }

    pub fn set_list<T: ToValue>(
        &mut self,
        section: &str,
        key: &str,
        items: &[T],
        tier: Tier,
    ) -> &str {
        self.emplace(section, tier).set_list(key, items)
    }

    pub fn set_list_base<T: ToValue>(
        &mut self,
        section: &str,
        key: &str,
        items: &[T],
        tier: Tier,
        base: u32,
    ) -> &str {
        self.emplace(section, tier).set_list_base(key, items, base)
    }

    /// Write the local tier.
    pub fn serialize<W: Write>(&self, local: W) -> Result<(), Error> {
        text::write(&self.local, local)
    }

    /// Write both tiers, global first, each to its own destination.
    pub fn serialize_both<W: Write, X: Write>(&self, local: W, global: X) -> Result<(), Error> {
        text::write(&self.global, global)?;
        text::write(&self.local, local)
    }

    /// Load a local-tier configuration from a file path.
    ///
    /// A file that cannot be opened is not an error: a warning is logged,
    /// the returned flag is `true`, and the store starts empty. Read
    /// failures mid-stream do error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, bool), Error> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                let config = Self::from_reader(BufReader::new(file))
                    .map_err(|err| err.with_path(path))?;
                Ok((config, false))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unable to open configuration file");
                Ok((Self::new(), true))
            }
        }
    }

    /// Load local and global tiers from two file paths. Each file that
    /// cannot be opened is warned about and its tier starts empty.
    pub fn from_files(local: impl AsRef<Path>, global: impl AsRef<Path>) -> Result<Self, Error> {
        let mut config = Self::new();
        for (path, tier) in [
            (global.as_ref(), &mut config.global),
            (local.as_ref(), &mut config.local),
        ] {
            match File::open(path) {
                Ok(file) => {
                    text::parse(tier, &mut config.unnamed, BufReader::new(file))
                        .map_err(|err| err.with_path(path))?;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "unable to open configuration file");
                }
            }
        }
        Ok(config)
    }

    /// Write the local tier to a file path.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| Error::from_io(err).with_path(path))?;
        let mut writer = BufWriter::new(file);
        text::write(&self.local, &mut writer).map_err(|err| err.with_path(path))?;
        writer
            .flush()
            .map_err(|err| Error::from_io(err).with_path(path))
    }

    /// Write both tiers to file paths, global first. Both destinations are
    /// opened before anything is written.
    pub fn to_files(&self, local: impl AsRef<Path>, global: impl AsRef<Path>) -> Result<(), Error> {
        let local = local.as_ref();
        let global = global.as_ref();
        let local_file = File::create(local).map_err(|err| Error::from_io(err).with_path(local))?;
        let global_file =
            File::create(global).map_err(|err| Error::from_io(err).with_path(global))?;

        let mut global_writer = BufWriter::new(global_file);
        text::write(&self.global, &mut global_writer).map_err(|err| err.with_path(global))?;
        global_writer
            .flush()
            .map_err(|err| Error::from_io(err).with_path(global))?;

        let mut local_writer = BufWriter::new(local_file);
        text::write(&self.local, &mut local_writer).map_err(|err| err.with_path(local))?;
        local_writer
            .flush()
            .map_err(|err| Error::from_io(err).with_path(local))
    }
}

/// Merged debugging view: the union of section names, each resolved with
/// local-first precedence, headers emitted unconditionally.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.names() {
            writeln!(f, "[{name}]")?;
            for (key, value) in self.section(&name).iter() {
                writeln!(f, "{key} = {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
