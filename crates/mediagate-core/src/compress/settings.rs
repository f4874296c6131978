//! Setting lookup
//!
//! A lookup first commits to one platform table: the requesting platform's,
//! else the `"default"` platform's, else the union of every platform table.
//! Only that table is then searched, at the breakpoint and then at
//! `"default"`. When the chosen table has neither key the caller's fallback
//! is used; other tables are never consulted.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::image_config::{SettingTable, DEFAULT_KEY};

/// Which platform table a lookup committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// `table[platform]`
    Platform,
    /// `table["default"]`
    Default,
    /// union of all platform tables
    Merged,
}

/// Which key inside the chosen table produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey {
    Breakpoint,
    Default,
}

/// Where a resolved setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupStep {
    pub table: TableSource,
    pub entry: EntryKey,
}

impl LookupStep {
    pub const fn new(table: TableSource, entry: EntryKey) -> Self {
        Self { table, entry }
    }
}

/// Table candidates, tried in order; the first non-empty one is used.
pub const TABLE_ORDER: [TableSource; 3] =
    [TableSource::Platform, TableSource::Default, TableSource::Merged];

/// Keys tried inside the chosen table.
pub const ENTRY_ORDER: [EntryKey; 2] = [EntryKey::Breakpoint, EntryKey::Default];

impl TableSource {
    fn select<'t, V: Copy>(
        self,
        table: &'t SettingTable<V>,
        platform: &str,
    ) -> Option<Cow<'t, BTreeMap<String, V>>> {
        let entries = match self {
            TableSource::Platform => Cow::Borrowed(table.get(platform)?),
            TableSource::Default => Cow::Borrowed(table.get(DEFAULT_KEY)?),
            TableSource::Merged => Cow::Owned(merge_platforms(table)),
        };
        (!entries.is_empty()).then_some(entries)
    }
}

impl EntryKey {
    fn lookup<V: Copy>(self, entries: &BTreeMap<String, V>, breakpoint: &str) -> Option<V> {
        match self {
            EntryKey::Breakpoint => entries.get(breakpoint).copied(),
            EntryKey::Default => entries.get(DEFAULT_KEY).copied(),
        }
    }
}

/// Union of every platform table; platforms later in key order override earlier ones.
fn merge_platforms<V: Copy>(table: &SettingTable<V>) -> BTreeMap<String, V> {
    let mut merged = BTreeMap::new();
    for entries in table.values() {
        for (key, value) in entries {
            merged.insert(key.clone(), *value);
        }
    }
    merged
}

/// Resolve the setting for `(platform, breakpoint)`, returning the value and
/// where it came from (`None` when `fallback` was used).
pub fn resolve_setting_step<V: Copy>(
    table: &SettingTable<V>,
    platform: &str,
    breakpoint: u32,
    fallback: V,
) -> (V, Option<LookupStep>) {
    let Some((source, entries)) = TABLE_ORDER
        .iter()
        .find_map(|source| source.select(table, platform).map(|entries| (*source, entries)))
    else {
        return (fallback, None);
    };

    let breakpoint = breakpoint.to_string();
    ENTRY_ORDER
        .iter()
        .find_map(|key| {
            key.lookup(&entries, &breakpoint)
                .map(|value| (value, Some(LookupStep::new(source, *key))))
        })
        .unwrap_or((fallback, None))
}

/// Resolve the setting for `(platform, breakpoint)`, falling back to `fallback`.
pub fn resolve_setting<V: Copy>(
    table: &SettingTable<V>,
    platform: &str,
    breakpoint: u32,
    fallback: V,
) -> V {
    resolve_setting_step(table, platform, breakpoint, fallback).0
}
