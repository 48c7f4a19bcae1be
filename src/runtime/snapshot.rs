//! Immutable configuration snapshot
//!
//! A [`SnapshotBuilder`] collects entries during initialization; `freeze`
//! turns it into a [`ConfigSnapshot`] in which every recognized key has
//! exactly one value. Nothing mutates a snapshot afterwards.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::env::ResolvedEnv;
use crate::runtime::keys::ConfigKey;

/// A resolved configuration value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigValue {
    String(String),
    Bool(bool),
    #[default]
    Undefined,
}

impl ConfigValue {
    /// Interpret a raw variable for `key`; flags are true only for `"true"`
    pub fn parse(key: ConfigKey, raw: &str) -> Self {
        if key.is_flag() {
            ConfigValue::Bool(raw == "true")
        } else {
            ConfigValue::String(raw.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, ConfigValue::Undefined)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Undefined => serializer.serialize_none(),
        }
    }
}

/// Where a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    Environment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: ConfigKey,
    pub value: ConfigValue,
    pub source: ConfigSource,
}

/// Append-only collector used while initializing
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entries: BTreeMap<ConfigKey, ConfigEntry>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; the first definition of a key wins
    pub fn define(mut self, key: ConfigKey, value: ConfigValue, source: ConfigSource) -> Self {
        if self.entries.contains_key(&key) {
            tracing::debug!(key = %key, "Configuration key already defined, keeping first value");
            return self;
        }
        self.entries.insert(key, ConfigEntry { key, value, source });
        self
    }

    /// Record a raw variable by name; unknown names are ignored
    pub fn define_raw(self, name: &str, raw: &str, source: ConfigSource) -> Self {
        match ConfigKey::from_name(name) {
            Some(key) => self.define(key, ConfigValue::parse(key, raw), source),
            None => self,
        }
    }

    /// Fill the remaining keys with `Undefined` and freeze
    pub fn freeze(mut self) -> ConfigSnapshot {
        for key in ConfigKey::ALL {
            self.entries.entry(key).or_insert(ConfigEntry {
                key,
                value: ConfigValue::Undefined,
                source: ConfigSource::Default,
            });
        }
        ConfigSnapshot {
            entries: self.entries,
        }
    }
}

/// Frozen mapping from every [`ConfigKey`] to its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    entries: BTreeMap<ConfigKey, ConfigEntry>,
}

impl ConfigSnapshot {
    /// Take every recognized key straight from a resolved environment
    pub fn from_env(env: &ResolvedEnv) -> Self {
        ConfigKey::ALL
            .into_iter()
            .fold(SnapshotBuilder::new(), |builder, key| match env.get(key.as_str()) {
                Some(raw) => builder.define(key, ConfigValue::parse(key, raw), ConfigSource::Environment),
                None => builder,
            })
            .freeze()
    }

    pub fn get(&self, key: ConfigKey) -> &ConfigValue {
        // freeze() guarantees every key is present
        self.entries
            .get(&key)
            .map(|entry| &entry.value)
            .unwrap_or(&ConfigValue::Undefined)
    }

    pub fn entry(&self, key: ConfigKey) -> Option<&ConfigEntry> {
        self.entries.get(&key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }

    /// Defined values only, keyed by variable name
    pub fn defined(&self) -> BTreeMap<&'static str, &ConfigValue> {
        self.entries
            .values()
            .filter(|entry| entry.value.is_defined())
            .map(|entry| (entry.key.as_str(), &entry.value))
            .collect()
    }
}
