//! # Schema Attribute Dictionary
//!
//! A finalized, read-only view of one schema version: for each attribute
//! key ([`HedKey`]) a map from normalized name (tag path, unit-class name,
//! unit, or modifier) to an [`AttributeValue`].
//!
//! ## Case Rules
//!
//! Tag paths, unit-class names, and SI word modifiers are stored
//! lower-cased and looked up case-insensitively. Unit symbols and SI symbol
//! modifiers are case-sensitive (`Hz` is not `hz`, `M` is not `m`) and are
//! stored verbatim. Original-case text for tags and prefixes is retained
//! for display.
//!
//! ## Construction
//!
//! Either fluently through [`DictionaryBuilder`] or by deserializing a
//! [`DictionarySnapshot`] from YAML or JSON. Both paths funnel through the
//! same normalization, so a snapshot and a builder describing the same
//! schema produce identical dictionaries. Once built the dictionary is never
//! mutated; it is `Send + Sync` and can be shared behind an `Arc`.
//!
//! Validators never touch the dictionary directly: they depend on the
//! [`SchemaQuery`] capability trait, which tests can implement with a fake.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HedError;

/// The attribute keys a dictionary is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HedKey {
    /// Every tag path in the vocabulary.
    AllTags,
    /// Value placeholders (`.../#`) whose final segment is free text.
    TakesValue,
    /// Value placeholders mapped to their unit classes.
    UnitClass,
    /// Unit classes mapped to their unit lists.
    Units,
    /// Unit classes mapped to their default unit.
    DefaultUnits,
    /// Prefixes at least one tag per string must start with.
    RequiredPrefix,
    /// Prefixes at most one tag per level may start with.
    Unique,
    /// Tags whose descendants may extend the vocabulary.
    ExtensionAllowedPropagated,
    /// Tags that may not be used as leaves.
    RequireChild,
    /// Units written as symbols (never pluralized, case-sensitive).
    UnitSymbol,
    /// SI magnitude modifiers in word form (`kilo`, `milli`).
    SiUnitModifier,
    /// SI magnitude modifiers in symbol form (`k`, `m`).
    SiUnitSymbolModifier,
}

impl HedKey {
    /// Every key, in declaration order.
    pub const ALL: [HedKey; 12] = [
        HedKey::AllTags,
        HedKey::TakesValue,
        HedKey::UnitClass,
        HedKey::Units,
        HedKey::DefaultUnits,
        HedKey::RequiredPrefix,
        HedKey::Unique,
        HedKey::ExtensionAllowedPropagated,
        HedKey::RequireChild,
        HedKey::UnitSymbol,
        HedKey::SiUnitModifier,
        HedKey::SiUnitSymbolModifier,
    ];

    /// Whether names under this key keep their case.
    pub fn is_case_sensitive(&self) -> bool {
        matches!(self, HedKey::UnitSymbol | HedKey::SiUnitSymbolModifier)
    }

    /// Whether entries under this key carry display text for the name.
    fn keeps_display(&self) -> bool {
        matches!(
            self,
            HedKey::AllTags | HedKey::RequiredPrefix | HedKey::Unique
        )
    }

    /// Normalize a name for storage or lookup under this key.
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.is_case_sensitive() || !name.chars().any(char::is_uppercase) {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_lowercase())
        }
    }
}

/// The value associated with one name under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Presence flag. `false` is treated as absent.
    Flag(bool),
    /// Display text, a class list, or a single unit.
    Text(String),
    /// Unit list or class list.
    List(Vec<String>),
}

impl AttributeValue {
    /// True unless this is `Flag(false)`.
    pub fn is_set(&self) -> bool {
        !matches!(self, AttributeValue::Flag(false))
    }

    /// The text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The list payload, if any.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Read-only schema queries the validators depend on.
///
/// Tag-path arguments may be in any case; implementations compare
/// case-insensitively. Unit and modifier symbols are compared verbatim.
pub trait SchemaQuery: Send + Sync {
    /// Whether `name` carries `key`.
    fn tag_has_attribute(&self, name: &str, key: HedKey) -> bool;

    /// Whether `path` is a vocabulary term.
    fn tag_exists(&self, path: &str) -> bool {
        self.tag_has_attribute(path, HedKey::AllTags)
    }

    /// Original-case display text for a name under `key`.
    fn attribute_display(&self, key: HedKey, name: &str) -> Option<&str>;

    /// Unit-class names (lower-cased) declared on a `.../#` path.
    fn unit_classes_for(&self, takes_value_path: &str) -> Vec<&str>;

    /// Units registered for a unit class.
    fn units_for_class(&self, class: &str) -> Option<&[String]>;

    /// Default unit of a unit class.
    fn default_unit_for_class(&self, class: &str) -> Option<&str>;

    /// Whether any unit class has units registered.
    fn has_unit_classes(&self) -> bool;

    /// Whether `class` has units registered.
    fn has_unit_class(&self, class: &str) -> bool {
        self.units_for_class(class).is_some()
    }

    /// Whether any SI modifiers are declared.
    fn has_unit_modifiers(&self) -> bool;

    /// Whether `unit` is written as a symbol.
    fn is_unit_symbol(&self, unit: &str) -> bool {
        self.tag_has_attribute(unit, HedKey::UnitSymbol)
    }

    /// SI modifiers of the symbol or word form.
    fn si_modifiers(&self, symbol: bool) -> Vec<&str>;

    /// `(normalized prefix, display prefix)` pairs marked unique.
    fn unique_prefixes(&self) -> Vec<(&str, &str)>;

    /// `(normalized prefix, display prefix)` pairs marked required.
    fn required_prefixes(&self) -> Vec<(&str, &str)>;
}

/// A finalized schema attribute dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaAttributeDictionary {
    version: Option<String>,
    entries: BTreeMap<HedKey, BTreeMap<String, AttributeValue>>,
}

impl SchemaAttributeDictionary {
    /// Start building a dictionary.
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Schema version label, if the source declared one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Number of names registered under `key`.
    pub fn attribute_count(&self, key: HedKey) -> usize {
        self.entries.get(&key).map_or(0, BTreeMap::len)
    }

    /// The value registered for `name` under `key`, if set.
    pub fn get(&self, key: HedKey, name: &str) -> Option<&AttributeValue> {
        let normalized = key.normalize(name);
        self.entries
            .get(&key)
            .and_then(|names| names.get(normalized.as_ref()))
            .filter(|value| value.is_set())
    }

    fn names(&self, key: HedKey) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.entries
            .get(&key)
            .into_iter()
            .flat_map(|names| names.iter())
            .filter(|(_, value)| value.is_set())
    }

    fn prefixes(&self, key: HedKey) -> Vec<(&str, &str)> {
        self.names(key)
            .map(|(name, value)| (name.as_str(), value.as_text().unwrap_or(name)))
            .collect()
    }

    /// Build a dictionary from a deserialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns `HedError::InvalidDictionary` if the snapshot is inconsistent.
    pub fn from_snapshot(snapshot: DictionarySnapshot) -> Result<Self, HedError> {
        let mut builder = DictionaryBuilder {
            version: snapshot.version,
            ..DictionaryBuilder::default()
        };
        for (key, names) in snapshot.attributes {
            for (name, value) in names {
                builder = builder.attribute(key, name, value);
            }
        }
        builder.build()
    }

    /// Parse a YAML snapshot.
    pub fn from_yaml_str(source: &str) -> Result<Self, HedError> {
        let snapshot: DictionarySnapshot = serde_yaml::from_str(source)?;
        Self::from_snapshot(snapshot)
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(source: &str) -> Result<Self, HedError> {
        let snapshot: DictionarySnapshot = serde_json::from_str(source)?;
        Self::from_snapshot(snapshot)
    }

    /// Load a snapshot file. `.json` files are read as JSON, anything else
    /// as YAML.
    ///
    /// # Errors
    ///
    /// Returns `HedError::SchemaLoad` if the file cannot be read or decoded,
    /// or `HedError::InvalidDictionary` if its contents are inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HedError::SchemaLoad {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        let dictionary = parsed.map_err(|e| match e {
            HedError::Serialization(reason) => HedError::SchemaLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!(
            path = %path.display(),
            version = dictionary.version().unwrap_or("unversioned"),
            tags = dictionary.attribute_count(HedKey::AllTags),
            "loaded schema attribute dictionary"
        );
        Ok(dictionary)
    }
}

impl SchemaQuery for SchemaAttributeDictionary {
    fn tag_has_attribute(&self, name: &str, key: HedKey) -> bool {
        self.get(key, name).is_some()
    }

    fn attribute_display(&self, key: HedKey, name: &str) -> Option<&str> {
        self.get(key, name).and_then(AttributeValue::as_text)
    }

    fn unit_classes_for(&self, takes_value_path: &str) -> Vec<&str> {
        self.get(HedKey::UnitClass, takes_value_path)
            .and_then(AttributeValue::as_list)
            .map(|classes| classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn units_for_class(&self, class: &str) -> Option<&[String]> {
        self.get(HedKey::Units, class).and_then(AttributeValue::as_list)
    }

    fn default_unit_for_class(&self, class: &str) -> Option<&str> {
        self.get(HedKey::DefaultUnits, class)
            .and_then(AttributeValue::as_text)
    }

    fn has_unit_classes(&self) -> bool {
        self.names(HedKey::Units).next().is_some()
    }

    fn has_unit_modifiers(&self) -> bool {
        self.names(HedKey::SiUnitModifier).next().is_some()
            || self.names(HedKey::SiUnitSymbolModifier).next().is_some()
    }

    fn si_modifiers(&self, symbol: bool) -> Vec<&str> {
        let key = if symbol {
            HedKey::SiUnitSymbolModifier
        } else {
            HedKey::SiUnitModifier
        };
        self.names(key).map(|(name, _)| name.as_str()).collect()
    }

    fn unique_prefixes(&self) -> Vec<(&str, &str)> {
        self.prefixes(HedKey::Unique)
    }

    fn required_prefixes(&self) -> Vec<(&str, &str)> {
        self.prefixes(HedKey::RequiredPrefix)
    }
}

/// Serialized form of a finalized dictionary.
///
/// ```yaml
/// version: 8.0.0
/// attributes:
///   allTags: { Event: true, Event/Duration: true }
///   takesValue: { Event/Duration/#: true }
///   unitClass: { Event/Duration/#: time }
///   units: { time: [s, second] }
///   defaultUnits: { time: s }
///   unitSymbol: { s: true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionarySnapshot {
    /// Schema version label.
    #[serde(default)]
    pub version: Option<String>,
    /// Per-key name/value maps, names in original case.
    #[serde(default)]
    pub attributes: BTreeMap<HedKey, BTreeMap<String, AttributeValue>>,
}

/// Fluent constructor for [`SchemaAttributeDictionary`].
///
/// Every `*_tag` method also registers the path under `allTags`.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    version: Option<String>,
    raw: Vec<(HedKey, String, AttributeValue)>,
}

impl DictionaryBuilder {
    /// Set the version label.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Register an arbitrary attribute.
    #[must_use]
    pub fn attribute(
        mut self,
        key: HedKey,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        self.raw.push((key, name.into(), value));
        self
    }

    fn flag(self, key: HedKey, name: &str) -> Self {
        self.attribute(key, name, AttributeValue::Flag(true))
    }

    /// Register a vocabulary term.
    #[must_use]
    pub fn tag(self, path: &str) -> Self {
        self.flag(HedKey::AllTags, path)
    }

    /// Register `path/#` as a value placeholder. `path` itself is added as
    /// a term.
    #[must_use]
    pub fn takes_value(self, path: &str) -> Self {
        let placeholder = format!("{path}/#");
        self.tag(path)
            .flag(HedKey::AllTags, &placeholder)
            .flag(HedKey::TakesValue, &placeholder)
    }

    /// Register `path/#` as a value placeholder measured in `classes`.
    #[must_use]
    pub fn unit_class_tag(self, path: &str, classes: &[&str]) -> Self {
        let placeholder = format!("{path}/#");
        let classes = classes.iter().map(|c| c.to_string()).collect();
        self.takes_value(path)
            .attribute(HedKey::UnitClass, placeholder, AttributeValue::List(classes))
    }

    /// Register a unit class with its units and default unit.
    #[must_use]
    pub fn unit_class(self, class: &str, units: &[&str], default_unit: &str) -> Self {
        let units = units.iter().map(|u| u.to_string()).collect();
        self.attribute(HedKey::Units, class, AttributeValue::List(units))
            .attribute(
                HedKey::DefaultUnits,
                class,
                AttributeValue::Text(default_unit.to_string()),
            )
    }

    /// Mark a unit as a symbol.
    #[must_use]
    pub fn unit_symbol(self, unit: &str) -> Self {
        self.flag(HedKey::UnitSymbol, unit)
    }

    /// Declare an SI modifier in word form.
    #[must_use]
    pub fn si_unit_modifier(self, modifier: &str) -> Self {
        self.flag(HedKey::SiUnitModifier, modifier)
    }

    /// Declare an SI modifier in symbol form.
    #[must_use]
    pub fn si_unit_symbol_modifier(self, modifier: &str) -> Self {
        self.flag(HedKey::SiUnitSymbolModifier, modifier)
    }

    /// Require at least one tag under `prefix` per string.
    #[must_use]
    pub fn required_prefix(self, prefix: &str) -> Self {
        self.flag(HedKey::RequiredPrefix, prefix)
    }

    /// Allow at most one tag under `prefix` per level.
    #[must_use]
    pub fn unique(self, prefix: &str) -> Self {
        self.flag(HedKey::Unique, prefix)
    }

    /// Allow descendants of `path` outside the vocabulary.
    #[must_use]
    pub fn extension_allowed(self, path: &str) -> Self {
        self.flag(HedKey::ExtensionAllowedPropagated, path)
    }

    /// Forbid `path` as a leaf. `path` is added as a term.
    #[must_use]
    pub fn require_child(self, path: &str) -> Self {
        self.tag(path).flag(HedKey::RequireChild, path)
    }

    /// Normalize and check the collected attributes.
    ///
    /// # Errors
    ///
    /// Returns `HedError::InvalidDictionary` for an empty name, a value of
    /// the wrong shape for its key, a `unitClass` entry on a path that is
    /// not a `/#` placeholder, or a default unit for an undeclared class.
    pub fn build(self) -> Result<SchemaAttributeDictionary, HedError> {
        let mut entries: BTreeMap<HedKey, BTreeMap<String, AttributeValue>> = BTreeMap::new();

        for (key, name, value) in self.raw {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(HedError::InvalidDictionary(format!(
                    "empty name under {key:?}"
                )));
            }
            let normalized = key.normalize(trimmed).into_owned();
            let value = normalize_value(key, trimmed, &normalized, value)?;
            entries.entry(key).or_default().insert(normalized, value);
        }

        let empty = BTreeMap::new();
        let units = entries.get(&HedKey::Units).unwrap_or(&empty);
        if let Some(defaults) = entries.get(&HedKey::DefaultUnits) {
            if let Some(class) = defaults.keys().find(|class| !units.contains_key(*class)) {
                return Err(HedError::InvalidDictionary(format!(
                    "default unit declared for unit class '{class}' which has no units"
                )));
            }
        }

        Ok(SchemaAttributeDictionary {
            version: self.version,
            entries,
        })
    }
}

fn normalize_value(
    key: HedKey,
    original: &str,
    normalized: &str,
    value: AttributeValue,
) -> Result<AttributeValue, HedError> {
    let shape_error = |expected: &str| {
        HedError::InvalidDictionary(format!(
            "{key:?} entry '{original}' must be {expected}"
        ))
    };
    match key {
        HedKey::UnitClass => {
            if !normalized.ends_with("/#") && normalized != "#" {
                return Err(HedError::InvalidDictionary(format!(
                    "unit classes may only be declared on value placeholders, got '{original}'"
                )));
            }
            let classes: Vec<String> = match value {
                AttributeValue::Text(text) => text.split(',').map(str::to_string).collect(),
                AttributeValue::List(items) => items,
                AttributeValue::Flag(_) => return Err(shape_error("a class list")),
            };
            let classes: Vec<String> = classes
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect();
            if classes.is_empty() {
                return Err(shape_error("a non-empty class list"));
            }
            Ok(AttributeValue::List(classes))
        }
        HedKey::Units => match value {
            AttributeValue::List(units) => Ok(AttributeValue::List(
                units.into_iter().map(|u| u.trim().to_string()).collect(),
            )),
            AttributeValue::Text(text) => Ok(AttributeValue::List(
                text.split(',').map(|u| u.trim().to_string()).collect(),
            )),
            AttributeValue::Flag(_) => Err(shape_error("a unit list")),
        },
        HedKey::DefaultUnits => match value {
            AttributeValue::Text(unit) => Ok(AttributeValue::Text(unit.trim().to_string())),
            _ => Err(shape_error("a single unit")),
        },
        _ if key.keeps_display() => match value {
            AttributeValue::Flag(true) => Ok(AttributeValue::Text(original.to_string())),
            AttributeValue::Text(display) => Ok(AttributeValue::Text(display)),
            AttributeValue::Flag(false) => Ok(AttributeValue::Flag(false)),
            AttributeValue::List(_) => Err(shape_error("a flag or display text")),
        },
        _ => match value {
            AttributeValue::List(_) => Err(shape_error("a flag")),
            other => Ok(other),
        },
    }
}
