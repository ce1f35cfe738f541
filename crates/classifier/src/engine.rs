//! ONNX Runtime session wrapper for the breed classifier.

use std::path::Path;

use image::DynamicImage;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use tracing::debug;

use crate::error::ClassifierError;
use crate::preprocess::{TensorLayout, image_to_tensor};

/// Input resolution assumed when the model declares dynamic spatial dimensions.
const DEFAULT_INPUT_SIZE: u32 = 224;

/// A loaded inference session plus the input geometry discovered from it.
pub struct InferenceEngine {
    session: Session,
    input_name: String,
    output_name: String,
    input_height: u32,
    input_width: u32,
    layout: TensorLayout,
}

impl InferenceEngine {
    /// Opens an ONNX model and discovers its input and output tensor metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created or the model
    /// declares no usable input or output tensors.
    pub fn new(model_path: &Path) -> Result<Self, ClassifierError> {
        let session = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .commit_from_file(model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| ClassifierError::Model("model declares no input tensors".to_string()))?;
        let input_name = input.name.clone();
        let input_shape = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect::<Vec<i64>>(),
            _ => Vec::new(),
        };

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                ClassifierError::Model("model declares no output tensors".to_string())
            })?;

        let (layout, input_height, input_width) = resolve_input_geometry(&input_shape);

        debug!(
            input = %input_name,
            output = %output_name,
            height = input_height,
            width = input_width,
            ?layout,
            "opened inference session"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
            input_height,
            input_width,
            layout,
        })
    }

    /// Runs one forward pass and returns the per-class scores.
    ///
    /// # Errors
    ///
    /// Returns an error if the forward pass fails or the output tensor is
    /// not a single score vector.
    pub fn infer(&mut self, image: &DynamicImage) -> Result<Vec<f32>, ClassifierError> {
        let tensor = image_to_tensor(image, self.input_height, self.input_width, self.layout);
        let input_tensor = TensorRef::from_array_view(tensor.view())?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let outputs = self.session.run(inputs)?;
        let (shape, data) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;

        scores_from_output(shape, data)
    }
}

/// Works out the tensor layout and spatial resolution from the model's
/// declared input shape. Dynamic dimensions fall back to 224.
fn resolve_input_geometry(shape: &[i64]) -> (TensorLayout, u32, u32) {
    if shape.len() == 4 {
        if shape[3] == 3 {
            let height = dimension_or_default(shape[1]);
            let width = dimension_or_default(shape[2]);
            return (TensorLayout::Nhwc, height, width);
        }
        if shape[1] == 3 {
            let height = dimension_or_default(shape[2]);
            let width = dimension_or_default(shape[3]);
            return (TensorLayout::Nchw, height, width);
        }
    }

    (TensorLayout::Nhwc, DEFAULT_INPUT_SIZE, DEFAULT_INPUT_SIZE)
}

fn dimension_or_default(dim: i64) -> u32 {
    // Dynamic dimensions are reported as -1.
    match u32::try_from(dim) {
        Ok(value) if value > 0 => value,
        _ => DEFAULT_INPUT_SIZE,
    }
}

/// Accepts `[classes]` or `[1, classes]` outputs and returns the score vector.
fn scores_from_output(shape: &[i64], data: &[f32]) -> Result<Vec<f32>, ClassifierError> {
    match shape {
        [_] | [1, _] if !data.is_empty() => Ok(data.to_vec()),
        _ => Err(ClassifierError::Output(format!(
            "expected a single score vector, got shape {shape:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_from_nhwc_shape() {
        let (layout, height, width) = resolve_input_geometry(&[1, 224, 224, 3]);
        assert_eq!(layout, TensorLayout::Nhwc);
        assert_eq!((height, width), (224, 224));
    }

    #[test]
    fn test_geometry_from_nchw_shape() {
        let (layout, height, width) = resolve_input_geometry(&[1, 3, 256, 320]);
        assert_eq!(layout, TensorLayout::Nchw);
        assert_eq!((height, width), (256, 320));
    }

    #[test]
    fn test_dynamic_dimensions_fall_back_to_default() {
        let (layout, height, width) = resolve_input_geometry(&[-1, -1, -1, 3]);
        assert_eq!(layout, TensorLayout::Nhwc);
        assert_eq!((height, width), (DEFAULT_INPUT_SIZE, DEFAULT_INPUT_SIZE));
    }

    #[test]
    fn test_unrecognized_shape_falls_back_to_default() {
        let (layout, height, width) = resolve_input_geometry(&[1, 128]);
        assert_eq!(layout, TensorLayout::Nhwc);
        assert_eq!((height, width), (DEFAULT_INPUT_SIZE, DEFAULT_INPUT_SIZE));
    }

    #[test]
    fn test_scores_accept_flat_and_batched_vectors() {
        let data = [0.1, 0.7, 0.2];
        assert_eq!(scores_from_output(&[3], &data).unwrap(), data.to_vec());
        assert_eq!(scores_from_output(&[1, 3], &data).unwrap(), data.to_vec());
    }

    #[test]
    fn test_scores_reject_batched_or_empty_output() {
        assert!(scores_from_output(&[2, 3], &[0.0; 6]).is_err());
        assert!(scores_from_output(&[0], &[]).is_err());
    }
}
