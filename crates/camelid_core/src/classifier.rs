use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::predictor::{DirichletSimulator, PredictionSource, Predictor};
use crate::preprocess::decode_image;
use crate::probabilities::Probabilities;
use crate::species::Species;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Species at the arg-max of `probabilities`.
    pub species: Species,
    /// Largest entry of `probabilities`.
    pub confidence: f32,
    pub probabilities: Probabilities,
    pub source: PredictionSource,
}

impl Classification {
    pub fn new(probabilities: Probabilities, source: PredictionSource) -> Self {
        let (species, confidence) = probabilities.top();
        Self {
            species,
            confidence,
            probabilities,
            source,
        }
    }

    /// `"🦙 Llama"`.
    pub fn headline(&self) -> String {
        format!("{} {}", self.species.info().icon, self.species)
    }
}

/// Decoding plus prediction, with the model replaced by the simulation when
/// it cannot be used.
pub struct Classifier {
    predictor: Box<dyn Predictor>,
    fallback_reason: Option<String>,
}

impl Classifier {
    pub fn new(predictor: Box<dyn Predictor>) -> Self {
        Self {
            predictor,
            fallback_reason: None,
        }
    }

    /// Picks the model when possible, otherwise the simulation.
    pub fn from_config(cfg: &ClassifierConfig) -> Result<Self> {
        cfg.validate()?;
        let reason = if cfg.force_simulation {
            "simulación forzada por configuración".to_string()
        } else {
            match Self::load_model(cfg) {
                Ok(predictor) => return Ok(Self::new(predictor)),
                Err(reason) => reason,
            }
        };
        tracing::warn!("usando simulación: {reason}");
        let simulator = DirichletSimulator::new(cfg.concentration, cfg.seed)?
            .with_preprocessor(cfg.preprocessor());
        Ok(Self {
            predictor: Box::new(simulator),
            fallback_reason: Some(reason),
        })
    }

    #[cfg(feature = "ort")]
    fn load_model(cfg: &ClassifierConfig) -> std::result::Result<Box<dyn Predictor>, String> {
        if !cfg.model_path.exists() {
            return Err(format!("no se encontró el modelo {}", cfg.model_path.display()));
        }
        crate::onnx::OnnxClassifier::new(cfg)
            .map(|c| Box::new(c) as Box<dyn Predictor>)
            .map_err(|e| e.to_string())
    }

    #[cfg(not(feature = "ort"))]
    fn load_model(_cfg: &ClassifierConfig) -> std::result::Result<Box<dyn Predictor>, String> {
        Err("compilado sin soporte ONNX Runtime".to_string())
    }

    pub fn source(&self) -> PredictionSource {
        self.predictor.source()
    }

    /// Why the simulation is in use, if it is.
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    pub fn classify_image(&self, image: &DynamicImage) -> Result<Classification> {
        let probabilities = self.predictor.predict(image)?;
        self.finish(probabilities)
    }

    /// Classification of the `index`-th item of a batch; a seeded simulation
    /// gives the same answer for the same index whatever the processing order.
    pub fn classify_image_at(&self, image: &DynamicImage, index: u64) -> Result<Classification> {
        let probabilities = self.predictor.predict_at(image, index)?;
        self.finish(probabilities)
    }

    fn finish(&self, probabilities: Probabilities) -> Result<Classification> {
        let classification = Classification::new(probabilities, self.predictor.source());
        tracing::debug!(
            species = %classification.species,
            confidence = classification.confidence,
            "classified"
        );
        Ok(classification)
    }

    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Classification> {
        let image = decode_image(bytes)?;
        self.classify_image(&image)
    }

    pub fn classify_path(&self, path: &Path) -> Result<Classification> {
        let bytes = fs::read(path)?;
        self.classify_bytes(&bytes)
    }

    pub fn classify_path_at(&self, path: &Path, index: u64) -> Result<Classification> {
        let image = decode_image(&fs::read(path)?)?;
        self.classify_image_at(&image, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    struct Fixed([f32; 4]);

    impl Predictor for Fixed {
        fn predict(&self, _image: &DynamicImage) -> Result<Probabilities> {
            Probabilities::new(&self.0)
        }

        fn source(&self) -> PredictionSource {
            PredictionSource::Model {
                path: "fixed.onnx".into(),
            }
        }
    }

    fn png_with_alpha() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(50, 20, Rgba([1, 2, 3, 128])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn simulated() -> ClassifierConfig {
        ClassifierConfig {
            force_simulation: true,
            seed: Some(11),
            input_size: 16,
            ..ClassifierConfig::default()
        }
    }

    #[test]
    fn reported_species_is_the_argmax() {
        let classifier = Classifier::new(Box::new(Fixed([0.1, 0.2, 0.6, 0.1])));
        let c = classifier.classify_bytes(&png_with_alpha()).unwrap();
        assert_eq!(c.species, Species::Llama);
        assert_eq!(c.confidence, c.probabilities.confidence());
        assert_eq!(c.headline(), "🦙 Llama");
        assert!(classifier.fallback_reason().is_none());
    }

    #[test]
    fn simulation_reports_argmax_consistently() {
        let classifier = Classifier::from_config(&simulated()).unwrap();
        assert_eq!(classifier.source(), PredictionSource::Simulation);
        let bytes = png_with_alpha();
        for _ in 0..50 {
            let c = classifier.classify_bytes(&bytes).unwrap();
            assert_eq!(Species::ALL[c.probabilities.argmax()], c.species);
            assert_eq!(c.source, PredictionSource::Simulation);
        }
    }

    #[test]
    fn missing_model_falls_back_with_reason() {
        let cfg = ClassifierConfig {
            model_path: "/nowhere/camelids.onnx".into(),
            force_simulation: false,
            ..simulated()
        };
        let classifier = Classifier::from_config(&cfg).unwrap();
        assert_eq!(classifier.source(), PredictionSource::Simulation);
        assert!(classifier.fallback_reason().is_some());
    }

    #[test]
    fn bad_bytes_abort_the_classification() {
        let classifier = Classifier::from_config(&simulated()).unwrap();
        let err = classifier.classify_bytes(b"plain text").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert!(err.to_string().contains("formato"));
    }

    #[test]
    fn bad_concentration_is_an_error() {
        let cfg = ClassifierConfig {
            concentration: 0.0,
            ..simulated()
        };
        assert!(Classifier::from_config(&cfg).is_err());
    }

    #[test]
    fn invalid_normalization_is_rejected_before_any_prediction() {
        let cfg = ClassifierConfig {
            normalize: true,
            std: [0.229, -0.224, 0.225],
            ..simulated()
        };
        let err = Classifier::from_config(&cfg).err().unwrap();
        assert!(matches!(err, Error::Config(_)));

        let cfg = ClassifierConfig {
            mean: [f32::NAN, 0.456, 0.406],
            ..simulated()
        };
        assert!(matches!(Classifier::from_config(&cfg), Err(Error::Config(_))));
    }

    #[test]
    fn classify_path_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.png");
        std::fs::write(&path, png_with_alpha()).unwrap();
        let classifier = Classifier::new(Box::new(Fixed([0.7, 0.1, 0.1, 0.1])));
        assert_eq!(classifier.classify_path(&path).unwrap().species, Species::Alpaca);
        assert!(matches!(
            classifier.classify_path(&dir.path().join("absent.png")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn indexed_classification_repeats_for_the_same_index() {
        let a = Classifier::from_config(&simulated()).unwrap();
        let b = Classifier::from_config(&simulated()).unwrap();
        let image = DynamicImage::new_rgb8(8, 8);
        let later = b.classify_image_at(&image, 3).unwrap();
        let first = b.classify_image_at(&image, 0).unwrap();
        assert_eq!(a.classify_image_at(&image, 0).unwrap(), first);
        assert_eq!(a.classify_image_at(&image, 3).unwrap(), later);
    }
}
