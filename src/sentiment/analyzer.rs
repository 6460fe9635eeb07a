//! Анализатор настроений твитов
//!
//! Обучает наивный Байесовский классификатор на размеченном корпусе
//! и определяет полярность нового текста.
//!
//! Конвейер обучения: токенизация -> предобработка -> бинарные признаки ->
//! перемешивание -> разбиение на обучающую и тестовую выборки ->
//! обучение -> точность на отложенной выборке.

use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::models::Label;
use crate::nlp::{FeatureSet, Preprocessor};
use crate::sentiment::corpus::CorpusProvider;
use crate::sentiment::naive_bayes::{
    InformativeFeature, LabelProbabilities, LabeledExample, NaiveBayesClassifier,
};
use crate::sentiment::persistence::{ModelStore, PersistedModel};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
struct TrainedState {
    classifier: NaiveBayesClassifier,
    accuracy: f64,
    train_len: usize,
    test_len: usize,
}

/// Анализатор настроений
///
/// `classify` и `accuracy` работают по `&self`, поэтому обученный анализатор
/// можно разделять между потоками через `Arc`.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    /// Предобработчик
    preprocessor: Preprocessor,
    /// Параметры обучения
    config: TrainingConfig,
    state: Option<TrainedState>,
}

impl SentimentAnalyzer {
    /// Создать необученный анализатор
    pub fn new() -> Self {
        Self::with_config(TrainingConfig::default())
    }

    /// Создать анализатор с параметрами обучения
    pub fn with_config(config: TrainingConfig) -> Self {
        let preprocessor = Preprocessor::new()
            .with_pos_mapping(config.pos_mapping)
            .with_token_filter(config.token_filter);

        Self {
            preprocessor,
            config,
            state: None,
        }
    }

    /// Установить предобработчик
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Признаки текста после полной предобработки
    pub fn features(&self, text: &str) -> FeatureSet {
        FeatureSet::from_tokens(self.preprocessor.process_text(text))
    }

    /// Обучить на парах (текст, метка)
    ///
    /// Метки: `positive` / `negative` без учёта регистра. Повторное обучение
    /// полностью заменяет модель; при ошибке прежняя модель сохраняется.
    pub fn train<I, T, L>(&mut self, corpus: I) -> Result<()>
    where
        I: IntoIterator<Item = (T, L)>,
        T: AsRef<str>,
        L: AsRef<str>,
    {
        let examples = corpus
            .into_iter()
            .map(|(text, label)| {
                let label: Label = label.as_ref().parse()?;
                Ok(LabeledExample::new(self.features(text.as_ref()), label))
            })
            .collect::<Result<Vec<_>>>()?;

        self.fit(examples)
    }

    /// Обучить на токенизированных твитах провайдера
    pub fn train_from_provider(&mut self, provider: &dyn CorpusProvider) -> Result<()> {
        let positive = provider.positive()?;
        let negative = provider.negative()?;
        info!(
            "Preprocessing {} positive and {} negative tweets",
            positive.len(),
            negative.len()
        );

        let examples = positive
            .iter()
            .map(|tokens| (tokens, Label::Positive))
            .chain(negative.iter().map(|tokens| (tokens, Label::Negative)))
            .map(|(tokens, label)| {
                LabeledExample::new(FeatureSet::from_tokens(self.preprocessor.process(tokens)), label)
            })
            .collect();

        self.fit(examples)
    }

    fn fit(&mut self, mut examples: Vec<LabeledExample>) -> Result<()> {
        self.config.validate()?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        examples.shuffle(&mut rng);

        let split_index =
            ((examples.len() as f64 * self.config.split_ratio).floor() as usize).min(examples.len());
        if split_index == 0 {
            return Err(Error::EmptyCorpus);
        }
        let (train_data, test_data) = examples.split_at(split_index);

        debug!(
            "Training on {} examples, holding out {}",
            train_data.len(),
            test_data.len()
        );
        let classifier =
            NaiveBayesClassifier::train_with_smoothing(train_data, self.config.smoothing())?;
        let accuracy = classifier.accuracy(test_data);

        info!(
            "Trained Naive Bayes: vocabulary {}, accuracy {:.3}",
            classifier.vocab_size(),
            accuracy
        );

        self.state = Some(TrainedState {
            classifier,
            accuracy,
            train_len: train_data.len(),
            test_len: test_data.len(),
        });
        Ok(())
    }

    fn trained(&self) -> Result<&TrainedState> {
        self.state.as_ref().ok_or(Error::NotTrained)
    }

    /// Определить полярность текста
    pub fn classify(&self, text: &str) -> Result<Label> {
        let state = self.trained()?;
        Ok(state.classifier.classify(&self.features(text)))
    }

    /// Апостериорные вероятности меток для текста
    pub fn classify_with_probabilities(&self, text: &str) -> Result<LabelProbabilities> {
        let state = self.trained()?;
        Ok(state.classifier.predict_proba(&self.features(text)))
    }

    /// Классифицировать несколько текстов
    pub fn classify_batch(&self, texts: &[String]) -> Result<Vec<Label>> {
        texts.iter().map(|text| self.classify(text)).collect()
    }

    /// Точность на отложенной выборке
    pub fn accuracy(&self) -> Result<f64> {
        Ok(self.trained()?.accuracy)
    }

    /// Размеры обучающей и тестовой выборок
    pub fn partition_sizes(&self) -> Option<(usize, usize)> {
        self.state.as_ref().map(|s| (s.train_len, s.test_len))
    }

    pub fn most_informative_features(&self, n: usize) -> Result<Vec<InformativeFeature>> {
        Ok(self.trained()?.classifier.most_informative_features(n))
    }

    pub fn classifier(&self) -> Option<&NaiveBayesClassifier> {
        self.state.as_ref().map(|s| &s.classifier)
    }

    /// Снимок обученной модели для сохранения
    pub fn to_persisted(&self) -> Result<PersistedModel> {
        let state = self.trained()?;
        Ok(PersistedModel {
            classifier: state.classifier.clone(),
            accuracy: state.accuracy,
            train_len: state.train_len,
            test_len: state.test_len,
            pos_mapping: self.preprocessor.pos_mapping(),
            token_filter: self.preprocessor.token_filter(),
        })
    }

    /// Восстановить обученное состояние
    ///
    /// Модель, обученная с другой предобработкой, отклоняется: её признаки
    /// не совпадут с признаками нового текста.
    pub fn restore(&mut self, model: PersistedModel) -> Result<()> {
        let mapping = self.preprocessor.pos_mapping();
        let filter = self.preprocessor.token_filter();
        if model.pos_mapping != mapping || model.token_filter != filter {
            return Err(Error::Persistence(format!(
                "model was trained with {:?}/{:?}, current preprocessing is {:?}/{:?}",
                model.pos_mapping, model.token_filter, mapping, filter
            )));
        }

        self.state = Some(TrainedState {
            classifier: model.classifier,
            accuracy: model.accuracy,
            train_len: model.train_len,
            test_len: model.test_len,
        });
        Ok(())
    }

    /// Загрузить модель из хранилища, а при неудаче обучить заново и сохранить
    pub fn load_or_train(
        &mut self,
        store: &ModelStore,
        provider: &dyn CorpusProvider,
    ) -> Result<()> {
        match store.load().and_then(|model| self.restore(model)) {
            Ok(()) => {
                info!("Model loaded from {}", store.path().display());
                Ok(())
            }
            Err(e) if e.is_recoverable_by_training() => {
                warn!("Cannot load model ({}), training from corpus", e);
                self.train_from_provider(provider)?;

                match self.to_persisted().and_then(|model| store.save(&model)) {
                    Ok(()) => info!("Model saved to {}", store.path().display()),
                    Err(e) => warn!("Failed to save model: {}", e),
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
