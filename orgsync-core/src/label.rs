//! Issue-tracker labels and case-insensitive label sets.
//!
//! A [`Label`] *matches* another when their [`LabelKey`]s (case-folded names)
//! are equal, and is *equal* to it when name, color and description all agree.
//! Colors and descriptions are normalized on construction so that the
//! representation returned by the hosting API compares equal to the declared
//! one.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// Case-folded label name; the join key between remote and declared sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey(String);

impl LabelKey {
    pub fn new(name: &str) -> Self {
        Self(caseless::default_case_fold_str(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single label: name, six-digit hex color (no `#`), description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub name: String,
    pub color: String,
    pub description: String,
}

impl Label {
    /// Build a label, normalizing the color and treating a missing
    /// description as empty.
    pub fn new(name: impl Into<String>, color: &str, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            color: normalize_color(color),
            description: description.unwrap_or_default().to_owned(),
        }
    }

    pub fn key(&self) -> LabelKey {
        LabelKey::new(&self.name)
    }

    /// Check the invariants required of a declared label.
    pub fn validate(&self, location: &str) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyLabelName {
                location: location.to_owned(),
            });
        }
        let valid_color =
            self.color.len() == 6 && self.color.chars().all(|c| c.is_ascii_hexdigit());
        if !valid_color {
            return Err(ConfigError::InvalidColor {
                label: self.name.clone(),
                color: self.color.clone(),
            });
        }
        Ok(())
    }

    /// Names of the attributes that differ from `other`.
    pub fn differences(&self, other: &Label) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name != other.name {
            fields.push("name");
        }
        if self.color != other.color {
            fields.push("color");
        }
        if self.description != other.description {
            fields.push("description");
        }
        fields
    }
}

/// Strip a leading `#` and lower-case the hex digits.
pub fn normalize_color(color: &str) -> String {
    color.trim().trim_start_matches('#').to_ascii_lowercase()
}

/// Labels keyed by case-folded name. Later inserts replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeMap<LabelKey, Label>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `label`, returning the label it replaced under the same key.
    pub fn insert(&mut self, label: Label) -> Option<Label> {
        self.0.insert(label.key(), label)
    }

    pub fn get(&self, key: &LabelKey) -> Option<&Label> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &LabelKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, LabelKey, Label> {
        self.0.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, LabelKey, Label> {
        self.0.keys()
    }

    pub fn labels(&self) -> btree_map::Values<'_, LabelKey, Label> {
        self.0.values()
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut set = Self::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = (&'a LabelKey, &'a Label);
    type IntoIter = btree_map::Iter<'a, LabelKey, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_is_normalized() {
        let label = Label::new("bug", "#D73A4A", None);
        assert_eq!(label.color, "d73a4a");
        assert_eq!(label.description, "");
    }

    #[test]
    fn keys_fold_case() {
        assert_eq!(LabelKey::new("Bug"), LabelKey::new("bug"));
        assert_eq!(LabelKey::new("Ünïcode"), LabelKey::new("ünïcode"));
    }

    #[test]
    fn keys_use_full_case_folding() {
        assert_eq!(LabelKey::new("Straße"), LabelKey::new("STRASSE"));
        assert_eq!(LabelKey::new("ΣΊΣΥΦΟΣ"), LabelKey::new("σίσυφος"));
    }

    #[test]
    fn null_and_empty_description_are_equal() {
        let a = Label::new("docs", "0075ca", None);
        let b = Label::new("docs", "0075ca", Some(""));
        assert_eq!(a, b);
    }

    #[test]
    fn case_only_rename_is_a_difference() {
        let remote = Label::new("Bug", "d73a4a", None);
        let declared = Label::new("bug", "d73a4a", None);
        assert_eq!(remote.key(), declared.key());
        assert_eq!(declared.differences(&remote), vec!["name"]);
    }

    #[test]
    fn last_write_wins_on_duplicate_keys() {
        let set: LabelSet = vec![
            Label::new("Bug", "ff0000", None),
            Label::new("bug", "00ff00", None),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
        let label = set.get(&LabelKey::new("BUG")).expect("present");
        assert_eq!(label.name, "bug");
        assert_eq!(label.color, "00ff00");
    }

    #[test]
    fn validate_rejects_bad_color_and_empty_name() {
        let bad_color = Label::new("bug", "red", None);
        assert!(matches!(
            bad_color.validate("standard"),
            Err(ConfigError::InvalidColor { .. })
        ));

        let empty = Label::new("  ", "ffffff", None);
        assert!(matches!(
            empty.validate("standard"),
            Err(ConfigError::EmptyLabelName { .. })
        ));

        assert!(Label::new("ok", "#ABCDEF", None).validate("standard").is_ok());
    }
}
