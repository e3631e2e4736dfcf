// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label classes and the current class selection.
//!
//! A label is a named color. Labels are loaded once from the settings file
//! into an ordered `LabelSet` whose names are unique.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// A labeling class: a name and the RGB color strokes of this class use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(rename = "r", alias = "R")]
    pub red: u8,
    #[serde(rename = "g", alias = "G")]
    pub green: u8,
    #[serde(rename = "b", alias = "B")]
    pub blue: u8,
}

impl Label {
    /// Create a label from a name and color components.
    pub fn new(name: impl Into<String>, red: u8, green: u8, blue: u8) -> Self {
        Self {
            name: name.into(),
            red,
            green,
            blue,
        }
    }

    /// Color as an `[r, g, b]` triple.
    pub fn color(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Ordered set of labels with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Label>", into = "Vec<Label>")]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Build a set, rejecting duplicate names. Insertion order is kept.
    pub fn new(labels: Vec<Label>) -> Result<Self, ConfigError> {
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].iter().any(|other| other.name == label.name) {
                return Err(ConfigError::DuplicateLabel(label.name.clone()));
            }
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Look a label up by name.
    pub fn find(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }
}

impl TryFrom<Vec<Label>> for LabelSet {
    type Error = ConfigError;

    fn try_from(labels: Vec<Label>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<LabelSet> for Vec<Label> {
    fn from(set: LabelSet) -> Self {
        set.labels
    }
}

/// Supplies the class a new stroke is drawn with.
pub trait ClassProvider {
    /// Name and color of the currently selected class.
    fn current_class(&self) -> (&str, [u8; 3]);
}

/// The class picker state: a label set and which entry is selected.
#[derive(Debug, Clone)]
pub struct ClassSelection {
    labels: LabelSet,
    current: usize,
}

impl ClassSelection {
    /// Create a selection with the first label selected.
    ///
    /// The label set must not be empty; settings validation guarantees it.
    pub fn new(labels: LabelSet) -> Self {
        Self { labels, current: 0 }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_label(&self) -> Option<&Label> {
        self.labels.get(self.current)
    }

    /// Select by index. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.labels.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Select by name. Returns false if no label has that name.
    pub fn select_name(&mut self, name: &str) -> bool {
        let position = self.labels.iter().position(|label| label.name == name);
        match position {
            Some(index) => self.select(index),
            None => false,
        }
    }
}

impl ClassProvider for ClassSelection {
    fn current_class(&self) -> (&str, [u8; 3]) {
        match self.current_label() {
            Some(label) => (label.name.as_str(), label.color()),
            None => ("", [0, 0, 0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_rejected() {
        let result = LabelSet::new(vec![
            Label::new("car", 255, 0, 0),
            Label::new("road", 0, 255, 0),
            Label::new("car", 0, 0, 255),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateLabel(name)) if name == "car"));
    }

    #[test]
    fn test_insertion_order_kept() {
        let set = LabelSet::new(vec![
            Label::new("sky", 0, 0, 255),
            Label::new("car", 255, 0, 0),
        ])
        .unwrap();
        let names: Vec<&str> = set.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["sky", "car"]);
        assert_eq!(set.find("car").unwrap().color(), [255, 0, 0]);
    }

    #[test]
    fn test_deserialize_accepts_original_keys() {
        let yaml = "- Name: person\n  R: 10\n  G: 20\n  B: 30\n- name: bike\n  r: 1\n  g: 2\n  b: 3\n";
        let set: LabelSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap(), &Label::new("person", 10, 20, 30));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[{"name":"a","r":0,"g":0,"b":0},{"name":"a","r":1,"g":1,"b":1}]"#;
        assert!(serde_json::from_str::<LabelSet>(json).is_err());
    }

    #[test]
    fn test_selection() {
        let set = LabelSet::new(vec![
            Label::new("sky", 0, 0, 255),
            Label::new("car", 255, 0, 0),
        ])
        .unwrap();
        let mut selection = ClassSelection::new(set);
        assert_eq!(selection.current_class(), ("sky", [0, 0, 255]));

        assert!(selection.select_name("car"));
        assert_eq!(selection.current_class(), ("car", [255, 0, 0]));

        assert!(!selection.select(5));
        assert_eq!(selection.current_index(), 1);
    }
}
