//! Camelid photo classification: species catalog, preprocessing and a
//! predictor that falls back to a Dirichlet simulation when no model is present.

mod batch;
mod classifier;
mod config;
mod error;
mod labels;
#[cfg(feature = "ort")]
mod onnx;
mod predictor;
mod preprocess;
mod probabilities;
mod species;

pub use batch::{ImageRow, ScanOptions, classify_all, export_csv, scan_folder};
pub use classifier::{Classification, Classifier};
pub use config::{CONFIG_FILE_NAME, ClassifierConfig};
pub use error::{Error, Result};
pub use labels::{label_map_from, load_labels, resolve_labels};
#[cfg(feature = "ort")]
pub use onnx::OnnxClassifier;
pub use predictor::{DEFAULT_CONCENTRATION, DirichletSimulator, LabelMap, PredictionSource, Predictor};
pub use preprocess::{
    IMAGENET_MEAN, IMAGENET_STD, Normalization, Preprocessor, SUPPORTED_EXTENSIONS, decode_image,
    is_supported_extension, resize_exact, to_rgb,
};
pub use probabilities::Probabilities;
pub use species::{Species, SpeciesInfo, TAXONOMY, TAXONOMY_SOURCE};
