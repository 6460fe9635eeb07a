//! Признаки для классификатора
//!
//! Бинарный мешок слов: каждому уникальному токену соответствует `true`.
//! Частоты не учитываются, отсутствующие слова не хранятся.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Набор признаков документа
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    features: BTreeMap<String, bool>,
}

impl FeatureSet {
    /// Построить набор из очищенных токенов
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: tokens.into_iter().map(|t| (t.into(), true)).collect(),
        }
    }

    /// Значение признака (`None`, если слова нет в документе)
    pub fn get(&self, feature: &str) -> Option<bool> {
        self.features.get(feature).copied()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.contains_key(feature)
    }

    /// Имена признаков в лексикографическом порядке
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.features.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}
