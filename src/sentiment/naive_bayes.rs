//! Наивный Байесовский классификатор
//!
//! Бинарные признаки (наличие слова), условно независимые при заданной метке.
//!
//! - P(label) = число примеров метки / число обучающих примеров
//! - P(feature | label) оценивается по частоте документов метки, содержащих слово,
//!   со сглаживанием (см. [`Smoothing`])
//! - Классификация: argmax по меткам `ln P(label) + Σ ln P(feature | label)` только
//!   по признакам документа; слова вне словаря модели пропускаются

use crate::error::{Error, Result};
use crate::models::Label;
use crate::nlp::FeatureSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Политика для пар (признак, метка), не встречавшихся при обучении
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// P = (count + alpha) / (n_label + 2 * alpha), alpha > 0; при alpha = 0.5 это
    /// expected likelihood estimate для бинарного признака
    Additive(f64),
    /// Относительная частота без сглаживания; невиданная пара не вносит вклада
    IgnoreUnseen,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Additive(0.5)
    }
}

/// Размеченный пример
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub features: FeatureSet,
    pub label: Label,
}

impl LabeledExample {
    pub fn new(features: FeatureSet, label: Label) -> Self {
        Self { features, label }
    }
}

/// Наивный Байесовский классификатор
///
/// Хранит только счётчики; вероятности вычисляются при классификации.
/// После обучения не изменяется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesClassifier {
    /// Число примеров каждой метки
    label_counts: [usize; 2],
    /// Для каждого слова: в скольких примерах каждой метки оно встретилось
    feature_counts: BTreeMap<String, [usize; 2]>,
    smoothing: Smoothing,
}

impl NaiveBayesClassifier {
    /// Обучить классификатор со сглаживанием по умолчанию
    pub fn train(examples: &[LabeledExample]) -> Result<Self> {
        Self::train_with_smoothing(examples, Smoothing::default())
    }

    /// Обучить классификатор
    pub fn train_with_smoothing(examples: &[LabeledExample], smoothing: Smoothing) -> Result<Self> {
        if examples.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if let Smoothing::Additive(alpha) = smoothing {
            if !(alpha > 0.0 && alpha.is_finite()) {
                return Err(Error::Config(format!("invalid smoothing alpha: {}", alpha)));
            }
        }

        let mut label_counts = [0usize; 2];
        let mut feature_counts: BTreeMap<String, [usize; 2]> = BTreeMap::new();

        for example in examples {
            let idx = example.label.index();
            label_counts[idx] += 1;

            for name in example.features.names() {
                feature_counts.entry(name.to_string()).or_insert([0, 0])[idx] += 1;
            }
        }

        Ok(Self {
            label_counts,
            feature_counts,
            smoothing,
        })
    }

    /// Априорная вероятность метки
    pub fn prior(&self, label: Label) -> f64 {
        self.label_counts[label.index()] as f64 / self.n_examples() as f64
    }

    /// P(feature = true | label)
    ///
    /// `None`, если слово вне словаря или пара не вносит вклада
    /// (политика `IgnoreUnseen`, пара не встречалась).
    pub fn likelihood(&self, feature: &str, label: Label) -> Option<f64> {
        let counts = self.feature_counts.get(feature)?;
        let count = counts[label.index()] as f64;
        let total = self.label_counts[label.index()] as f64;

        match self.smoothing {
            Smoothing::Additive(alpha) => {
                Some((count + alpha) / (total + 2.0 * alpha))
            }
            Smoothing::IgnoreUnseen => {
                if count == 0.0 {
                    None
                } else {
                    Some(count / total)
                }
            }
        }
    }

    /// Логарифм совместной вероятности для каждой метки (порядок `Label::ALL`)
    pub fn log_scores(&self, features: &FeatureSet) -> [(Label, f64); 2] {
        Label::ALL.map(|label| {
            if self.label_counts[label.index()] == 0 {
                return (label, f64::NEG_INFINITY);
            }

            let mut log_prob = self.prior(label).ln();
            for name in features.names() {
                // Игнорируем неизвестные слова
                if let Some(p) = self.likelihood(name, label) {
                    log_prob += p.ln();
                }
            }
            (label, log_prob)
        })
    }

    /// Предсказать метку
    ///
    /// При равенстве побеждает метка, идущая раньше в `Label::ALL`.
    pub fn classify(&self, features: &FeatureSet) -> Label {
        let scores = self.log_scores(features);
        let mut best = scores[0];
        for &(label, score) in &scores[1..] {
            if score > best.1 {
                best = (label, score);
            }
        }
        best.0
    }

    /// Апостериорные вероятности меток
    pub fn predict_proba(&self, features: &FeatureSet) -> LabelProbabilities {
        let scores = self.log_scores(features);
        let max_score = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);

        if !max_score.is_finite() {
            return LabelProbabilities {
                positive: 0.5,
                negative: 0.5,
            };
        }

        // Нормализуем в вероятности (softmax)
        let exp: Vec<f64> = scores.iter().map(|(_, s)| (s - max_score).exp()).collect();
        let sum: f64 = exp.iter().sum();

        LabelProbabilities {
            positive: exp[Label::Positive.index()] / sum,
            negative: exp[Label::Negative.index()] / sum,
        }
    }

    /// Доля верно классифицированных примеров (0.0 для пустой выборки)
    pub fn accuracy(&self, examples: &[LabeledExample]) -> f64 {
        if examples.is_empty() {
            return 0.0;
        }

        let correct = examples
            .iter()
            .filter(|e| self.classify(&e.features) == e.label)
            .count();

        correct as f64 / examples.len() as f64
    }

    /// Наиболее информативные признаки: наибольшее отношение
    /// P(feature | label) между метками
    pub fn most_informative_features(&self, n: usize) -> Vec<InformativeFeature> {
        let mut ranked: Vec<InformativeFeature> = self
            .feature_counts
            .keys()
            .filter_map(|name| {
                let probs = Label::ALL.map(|label| {
                    if self.label_counts[label.index()] == 0 {
                        return (label, 0.0);
                    }
                    (label, self.likelihood(name, label).unwrap_or(0.0))
                });
                let (favored, high) = if probs[0].1 >= probs[1].1 { probs[0] } else { probs[1] };
                let low = probs[0].1.min(probs[1].1);
                if high <= 0.0 {
                    return None;
                }
                let ratio = if low > 0.0 { high / low } else { f64::INFINITY };
                Some(InformativeFeature {
                    feature: name.clone(),
                    favored,
                    ratio,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.ratio
                .total_cmp(&a.ratio)
                .then_with(|| a.feature.cmp(&b.feature))
        });
        ranked.truncate(n);
        ranked
    }

    /// Число обучающих примеров
    pub fn n_examples(&self) -> usize {
        self.label_counts.iter().sum()
    }

    /// Число примеров метки
    pub fn label_count(&self, label: Label) -> usize {
        self.label_counts[label.index()]
    }

    /// Получить размер словаря
    pub fn vocab_size(&self) -> usize {
        self.feature_counts.len()
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

/// Вероятности меток
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelProbabilities {
    pub positive: f64,
    pub negative: f64,
}

impl LabelProbabilities {
    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
        }
    }
}

/// Признак с отношением правдоподобий
#[derive(Debug, Clone, PartialEq)]
pub struct InformativeFeature {
    pub feature: String,
    /// Метка, для которой признак вероятнее
    pub favored: Label,
    /// P(feature | favored) / P(feature | other)
    pub ratio: f64,
}

impl fmt::Display for InformativeFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let other = match self.favored {
            Label::Positive => Label::Negative,
            Label::Negative => Label::Positive,
        };
        write!(
            f,
            "{:>20} = True   {} : {} = {:>6.1} : 1.0",
            self.feature, self.favored, other, self.ratio
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(words: &[&str], label: Label) -> LabeledExample {
        LabeledExample::new(FeatureSet::from_tokens(words.iter().copied()), label)
    }

    fn features(words: &[&str]) -> FeatureSet {
        FeatureSet::from_tokens(words.iter().copied())
    }

    #[test]
    fn test_naive_bayes_basic() {
        let examples = vec![
            example(&["good", "great", "awesome"], Label::Positive),
            example(&["excellent", "amazing"], Label::Positive),
            example(&["bad", "terrible"], Label::Negative),
            example(&["awful", "horrible", "worst"], Label::Negative),
        ];

        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        assert_eq!(classifier.classify(&features(&["good", "great"])), Label::Positive);
        assert_eq!(classifier.classify(&features(&["bad", "terrible"])), Label::Negative);
    }

    #[test]
    fn test_priors_and_likelihoods() {
        let examples = vec![
            example(&["great"], Label::Positive),
            example(&["great", "fun"], Label::Positive),
            example(&["bad"], Label::Negative),
        ];

        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        assert!((classifier.prior(Label::Positive) - 2.0 / 3.0).abs() < 1e-12);
        assert!((classifier.prior(Label::Negative) - 1.0 / 3.0).abs() < 1e-12);
        // (2 + 0.5) / (2 + 1)
        let p = classifier.likelihood("great", Label::Positive).unwrap();
        assert!((p - 2.5 / 3.0).abs() < 1e-12);
        // (0 + 0.5) / (1 + 1)
        let p = classifier.likelihood("great", Label::Negative).unwrap();
        assert!((p - 0.25).abs() < 1e-12);
        assert_eq!(classifier.likelihood("unknown", Label::Positive), None);
        assert_eq!(classifier.vocab_size(), 3);
        assert_eq!(classifier.n_examples(), 3);
    }

    #[test]
    fn test_unknown_features_are_skipped() {
        let examples = vec![
            example(&["great"], Label::Positive),
            example(&["bad"], Label::Negative),
        ];
        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        let with_unknown = classifier.log_scores(&features(&["great", "zzz"]));
        let without = classifier.log_scores(&features(&["great"]));

        assert_eq!(with_unknown, without);
    }

    #[test]
    fn test_tie_breaks_to_positive() {
        let examples = vec![
            example(&["same"], Label::Positive),
            example(&["same"], Label::Negative),
        ];
        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        assert_eq!(classifier.classify(&features(&["same"])), Label::Positive);
        assert_eq!(classifier.classify(&FeatureSet::default()), Label::Positive);
    }

    #[test]
    fn test_ignore_unseen_policy() {
        let examples = vec![
            example(&["great"], Label::Positive),
            example(&["bad"], Label::Negative),
        ];
        let classifier =
            NaiveBayesClassifier::train_with_smoothing(&examples, Smoothing::IgnoreUnseen).unwrap();

        assert_eq!(classifier.likelihood("great", Label::Positive), Some(1.0));
        assert_eq!(classifier.likelihood("great", Label::Negative), None);

        // Невиданная пара не обнуляет метку
        let scores = classifier.log_scores(&features(&["great"]));
        assert!((scores[1].1 - 0.5f64.ln()).abs() < 1e-12);
        assert!(scores[1].1.is_finite());
    }

    #[test]
    fn test_missing_label_never_wins() {
        let examples = vec![example(&["great"], Label::Positive)];
        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        assert_eq!(classifier.classify(&features(&["anything"])), Label::Positive);
        assert_eq!(classifier.log_scores(&FeatureSet::default())[1].1, f64::NEG_INFINITY);
    }

    #[test]
    fn test_naive_bayes_probabilities() {
        let examples = vec![
            example(&["moon"], Label::Positive),
            example(&["crash"], Label::Negative),
        ];
        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        let probs = classifier.predict_proba(&features(&["moon"]));

        assert!(probs.positive > probs.negative);
        assert!((probs.positive + probs.negative - 1.0).abs() < 1e-9);
        assert_eq!(probs.get(Label::Positive), probs.positive);
    }

    #[test]
    fn test_accuracy_score() {
        let train = vec![
            example(&["buy"], Label::Positive),
            example(&["buy"], Label::Positive),
            example(&["sell"], Label::Negative),
            example(&["sell"], Label::Negative),
        ];
        let classifier = NaiveBayesClassifier::train(&train).unwrap();

        let test = vec![
            example(&["buy"], Label::Positive),
            example(&["sell"], Label::Negative),
        ];

        assert_eq!(classifier.accuracy(&test), 1.0);
        assert_eq!(classifier.accuracy(&[]), 0.0);
    }

    #[test]
    fn test_empty_training_set() {
        assert!(matches!(NaiveBayesClassifier::train(&[]), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_invalid_alpha() {
        let examples = vec![example(&["great"], Label::Positive)];
        for alpha in [-1.0, 0.0, f64::NAN] {
            let result = NaiveBayesClassifier::train_with_smoothing(&examples, Smoothing::Additive(alpha));
            assert!(matches!(result, Err(Error::Config(_))), "alpha {alpha}");
        }
    }

    #[test]
    fn test_unseen_pair_does_not_veto_label() {
        let examples = vec![
            example(&["great", "fun"], Label::Positive),
            example(&["great", "fun"], Label::Positive),
            example(&["bad", "awful"], Label::Negative),
            example(&["bad", "awful"], Label::Negative),
            example(&["bad", "awful"], Label::Negative),
        ];
        let classifier = NaiveBayesClassifier::train(&examples).unwrap();
        let mixed = features(&["bad", "awful", "great"]);

        let scores = classifier.log_scores(&mixed);
        assert!(scores.iter().all(|(_, score)| score.is_finite()));
        assert_eq!(classifier.classify(&mixed), Label::Negative);
    }

    #[test]
    fn test_most_informative_features() {
        let examples = vec![
            example(&["love", "day"], Label::Positive),
            example(&["love", "sun"], Label::Positive),
            example(&["hate", "day"], Label::Negative),
            example(&["hate", "rain"], Label::Negative),
        ];
        let classifier = NaiveBayesClassifier::train(&examples).unwrap();

        let top = classifier.most_informative_features(2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, "hate");
        assert_eq!(top[0].favored, Label::Negative);
        assert_eq!(top[1].feature, "love");
        assert_eq!(top[1].favored, Label::Positive);
        // (2.5 / 3) / (0.5 / 3)
        assert!((top[0].ratio - 5.0).abs() < 1e-9);
    }
}
