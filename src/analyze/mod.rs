// src/analyze/mod.rs
//! Concrete classifiers and the start-up factory.

pub mod inference;
pub mod lexicon;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{ClassifierConfig, ClassifierKind};
use crate::sentiment::Classifier;

pub use crate::analyze::inference::InferenceClassifier;
pub use crate::analyze::lexicon::LexiconClassifier;

/// Build the configured classifier. Any error here is fatal for the run.
pub async fn build_classifier(cfg: &ClassifierConfig) -> Result<Box<dyn Classifier>> {
    match cfg.kind {
        ClassifierKind::Lexicon => {
            let clf = match cfg.lexicon_path.as_deref() {
                Some(p) => LexiconClassifier::from_path(p)?,
                None => LexiconClassifier::embedded()?,
            };
            info!(classifier = clf.name(), "classifier loaded");
            Ok(Box::new(clf))
        }
        ClassifierKind::Inference => {
            let clf = InferenceClassifier::from_config(cfg)?;
            clf.probe()
                .await
                .context("inference classifier failed to initialize")?;
            Ok(Box::new(clf))
        }
    }
}
