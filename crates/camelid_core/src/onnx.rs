//! Pretrained-model backend running on ONNX Runtime.

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::labels::resolve_labels;
use crate::predictor::{LabelMap, PredictionSource, Predictor};
use crate::preprocess::Preprocessor;
use crate::probabilities::Probabilities;
use image::DynamicImage;
use ndarray::CowArray;
use once_cell::sync::Lazy;
use ort::{
    GraphOptimizationLevel, SessionBuilder, environment::Environment, session::Session,
    tensor::OrtOwnedTensor, value::Value,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

static ORT_ENV: Lazy<std::result::Result<Arc<Environment>, String>> = Lazy::new(|| {
    Environment::builder()
        .with_name("camelids")
        .build()
        .map(|env| env.into_arc())
        .map_err(|e| e.to_string())
});

/// Single-image classifier for an ONNX model with four class outputs.
pub struct OnnxClassifier {
    session: Session,
    model_path: PathBuf,
    labels: LabelMap,
    preprocessor: Preprocessor,
}

impl OnnxClassifier {
    pub fn new(cfg: &ClassifierConfig) -> Result<Self> {
        let model_error = |message: String| Error::Model {
            path: cfg.model_path.clone(),
            message,
        };
        if !cfg.model_path.exists() {
            return Err(model_error("el archivo no existe".to_string()));
        }
        let env = ORT_ENV.as_ref().map_err(|e| model_error(e.clone()))?.clone();
        let session = SessionBuilder::new(&env)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_model_from_file(&cfg.model_path))
            .map_err(|e| model_error(e.to_string()))?;

        let labels = resolve_labels(&cfg.labels_path);
        tracing::info!(
            "modelo cargado: {} ({}px)",
            cfg.model_path.display(),
            cfg.input_size
        );

        Ok(Self {
            session,
            model_path: cfg.model_path.clone(),
            labels,
            preprocessor: cfg.preprocessor(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn run(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let model_error = |message: String| Error::Model {
            path: self.model_path.clone(),
            message,
        };
        let tensor = self.preprocessor.to_tensor(image).into_dyn();
        let cow = CowArray::from(tensor.view());
        let input = Value::from_array(self.session.allocator(), &cow)
            .map_err(|e| model_error(format!("no se pudo construir el tensor: {e}")))?;
        let outputs: Vec<Value> = self
            .session
            .run(vec![input])
            .map_err(|e| model_error(e.to_string()))?;
        let first = outputs
            .first()
            .ok_or_else(|| model_error("el modelo no produjo salidas".to_string()))?;
        let scores: OrtOwnedTensor<f32, _> = first
            .try_extract()
            .map_err(|e| model_error(e.to_string()))?;
        let view = scores.view();
        Ok(view.iter().cloned().collect())
    }
}

impl Predictor for OnnxClassifier {
    fn predict(&self, image: &DynamicImage) -> Result<Probabilities> {
        let scores = self.run(image)?;
        let ordered = self.labels.reorder(&scores)?;
        Probabilities::from_scores(&ordered)
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Model {
            path: self.model_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_reported() {
        let cfg = ClassifierConfig {
            model_path: PathBuf::from("/nonexistent/camelids.onnx"),
            ..ClassifierConfig::default()
        };
        match OnnxClassifier::new(&cfg) {
            Err(Error::Model { path, .. }) => assert_eq!(path, cfg.model_path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("model should not load"),
        }
    }
}
