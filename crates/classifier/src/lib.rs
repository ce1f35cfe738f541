//! Cattle breed classification over a bundled ONNX model.
//!
//! The classifier is built once at startup. When the model or label files
//! are missing it stays in an unavailable state and every classification
//! returns the `Unknown` sentinel instead of an error.

use std::path::Path;

use image::DynamicImage;
use tracing::{info, warn};

mod engine;
mod error;
mod labels;
mod preprocess;

pub use error::ClassifierError;
pub use labels::{LabelIndex, UNKNOWN_LABEL};
pub use preprocess::{TensorLayout, image_to_tensor};

use engine::InferenceEngine;

/// A single classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Confidence as a percentage in `[0, 100]`.
    pub confidence: f32,
}

impl Prediction {
    /// The sentinel returned when no model is available or the scores are
    /// empty.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            confidence: 0.0,
        }
    }
}

enum State {
    Ready {
        engine: InferenceEngine,
        labels: LabelIndex,
    },
    Unavailable {
        reason: String,
    },
}

/// Breed classifier with a fixed readiness decided at construction.
///
/// Loading is attempted exactly once; a classifier that comes up
/// unavailable never retries.
pub struct BreedClassifier {
    state: State,
}

impl BreedClassifier {
    /// Loads the model and label index, falling back to the unavailable
    /// state if either cannot be read.
    #[must_use]
    pub fn load(model_path: &Path, labels_path: &Path) -> Self {
        match Self::try_load(model_path, labels_path) {
            Ok(classifier) => classifier,
            Err(err) => {
                warn!(
                    error = %err,
                    "classifier unavailable; classify will return the Unknown sentinel"
                );
                Self {
                    state: State::Unavailable {
                        reason: err.to_string(),
                    },
                }
            }
        }
    }

    fn try_load(model_path: &Path, labels_path: &Path) -> Result<Self, ClassifierError> {
        let labels = LabelIndex::from_file(labels_path)?;
        let engine = InferenceEngine::new(model_path)?;

        info!(
            model = %model_path.display(),
            classes = labels.len(),
            "breed classifier ready"
        );

        Ok(Self {
            state: State::Ready { engine, labels },
        })
    }

    /// Classifies one image.
    ///
    /// An unavailable classifier returns the `Unknown` sentinel with zero
    /// confidence rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when a loaded model fails during inference.
    pub fn classify(&mut self, image: &DynamicImage) -> Result<Prediction, ClassifierError> {
        match &mut self.state {
            State::Unavailable { .. } => Ok(Prediction::unknown()),
            State::Ready { engine, labels } => {
                let scores = engine.infer(image)?;
                Ok(prediction_from_scores(&scores, labels))
            }
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    /// Human-readable readiness line for status banners.
    #[must_use]
    pub fn status(&self) -> String {
        match &self.state {
            State::Ready { labels, .. } => format!("ready ({} breeds)", labels.len()),
            State::Unavailable { reason } => format!("unavailable: {reason}"),
        }
    }
}

/// Index of the highest score. Ties resolve to the first index.
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best
}

fn prediction_from_scores(scores: &[f32], labels: &LabelIndex) -> Prediction {
    let Some((index, score)) = argmax(scores) else {
        return Prediction::unknown();
    };

    Prediction {
        label: labels.name_for(index).to_string(),
        confidence: (score * 100.0).clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn label_index(names: &[&str]) -> LabelIndex {
        let map: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(index, name)| ((*name).to_string(), index))
            .collect();
        LabelIndex::from_name_map(map)
    }

    #[test]
    fn test_missing_model_yields_unavailable_classifier() {
        let mut classifier = BreedClassifier::load(
            Path::new("missing/model.onnx"),
            Path::new("missing/classes.json"),
        );

        assert!(!classifier.is_ready());
        assert!(classifier.status().contains("unavailable"));

        let image = DynamicImage::new_rgb8(8, 8);
        let prediction = classifier.classify(&image).unwrap();
        assert_eq!(prediction, Prediction::unknown());
    }

    #[test]
    fn test_argmax_picks_highest_score() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
    }

    #[test]
    fn test_argmax_tie_resolves_to_first_index() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some((0, 0.4)));
    }

    #[test]
    fn test_argmax_of_empty_scores_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_prediction_maps_index_to_label_and_percentage() {
        let labels = label_index(&["Gir", "Sahiwal", "Tharparkar"]);
        let prediction = prediction_from_scores(&[0.05, 0.92, 0.03], &labels);
        assert_eq!(prediction.label, "Sahiwal");
        assert!((prediction.confidence - 92.0).abs() < 1e-4);
    }

    #[test]
    fn test_prediction_confidence_is_clamped() {
        let labels = label_index(&["Gir"]);

        let over = prediction_from_scores(&[1.5], &labels);
        assert_eq!(over.confidence, 100.0);

        let under = prediction_from_scores(&[-0.5], &labels);
        assert_eq!(under.confidence, 0.0);
    }

    #[test]
    fn test_prediction_for_unlabeled_index_is_unknown() {
        let labels = label_index(&["Gir"]);
        let prediction = prediction_from_scores(&[0.1, 0.9], &labels);
        assert_eq!(prediction.label, UNKNOWN_LABEL);
    }

    #[test]
    fn test_prediction_from_empty_scores_is_unknown() {
        let labels = label_index(&["Gir"]);
        assert_eq!(prediction_from_scores(&[], &labels), Prediction::unknown());
    }
}
