use crate::error::Error;
use crate::predictor::DEFAULT_CONCENTRATION;
use crate::preprocess::{IMAGENET_MEAN, IMAGENET_STD, Normalization, Preprocessor};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional file name for [`ClassifierConfig::load`].
pub const CONFIG_FILE_NAME: &str = "camelids.toml";

/// Settings for model loading, preprocessing and the fallback simulation.
///
/// Every key is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub input_size: u32,
    /// When false, pixels are only scaled to `[0, 1]`.
    pub normalize: bool,
    pub mean: [f32; 3],
    pub std: [f32; 3],
    /// Dirichlet concentration used by the simulation.
    pub concentration: f32,
    pub seed: Option<u64>,
    /// Skip the model even when one is available.
    pub force_simulation: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/camelids.onnx"),
            labels_path: PathBuf::from("models/labels.txt"),
            input_size: 224,
            normalize: true,
            mean: IMAGENET_MEAN,
            std: IMAGENET_STD,
            concentration: DEFAULT_CONCENTRATION,
            seed: None,
            force_simulation: false,
        }
    }
}

impl ClassifierConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("{} no existe, usando configuración por defecto", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("no se pudo leer {}", path.display()))?;
        let cfg: Self =
            toml::from_str(&raw).with_context(|| format!("TOML inválido en {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Returns the first existing candidate's config, else the defaults.
    pub fn discover<I, P>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for candidate in candidates {
            if candidate.as_ref().exists() {
                return Self::load(candidate);
            }
        }
        Ok(Self::default())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("no se pudo escribir {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.input_size == 0 {
            return Err(Error::Config("input_size debe ser mayor que 0".to_string()));
        }
        if !self.concentration.is_finite() || self.concentration <= 0.0 {
            return Err(Error::Config(format!(
                "concentration debe ser positiva, es {}",
                self.concentration
            )));
        }
        if !self.mean.iter().all(|m| m.is_finite()) {
            return Err(Error::Config(format!("mean debe ser finita, es {:?}", self.mean)));
        }
        if !self.std.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(Error::Config(format!(
                "std debe ser positiva y finita, es {:?}",
                self.std
            )));
        }
        Ok(())
    }

    pub fn normalization(&self) -> Normalization {
        if self.normalize {
            Normalization::MeanStd {
                mean: self.mean,
                std: self.std,
            }
        } else {
            Normalization::Unit
        }
    }

    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.input_size, self.normalization())
    }
}
