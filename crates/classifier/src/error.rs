//! Classifier error types.

use thiserror::Error;

/// Errors from loading classifier artifacts or running inference.
///
/// Load-time errors never escape the adapter; they downgrade it to the
/// Unavailable state. Inference errors in the Ready state propagate.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A model artifact could not be read.
    #[error("failed to read classifier artifact: {0}")]
    Io(#[from] std::io::Error),

    /// The label index file is not a valid JSON object of name -> index pairs.
    #[error("failed to parse label index: {0}")]
    Labels(#[from] serde_json::Error),

    /// ONNX Runtime rejected the model or the forward pass.
    #[error("inference session error: {0}")]
    Session(#[from] ort::Error),

    /// The model's declared metadata cannot drive a classifier.
    #[error("unsupported model: {0}")]
    Model(String),

    /// The forward pass produced output this classifier cannot interpret.
    #[error("malformed model output: {0}")]
    Output(String),
}
