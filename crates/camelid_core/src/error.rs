use std::path::PathBuf;

/// Failures surfaced by the classification pipeline.
///
/// Every variant renders as a single human-readable line so the GUI can show
/// it verbatim in its status area.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("formato de imagen no soportado: {0}")]
    UnsupportedFormat(String),
    #[error("no se pudo decodificar la imagen: {0}")]
    Decode(#[from] image::ImageError),
    #[error("vector de probabilidades inválido: {0}")]
    InvalidProbabilities(String),
    #[error("simulación no disponible: {0}")]
    Simulation(String),
    #[error("modelo {}: {message}", .path.display())]
    Model { path: PathBuf, message: String },
    #[error("etiquetas {}: {message}", .path.display())]
    Labels { path: PathBuf, message: String },
    #[error("orden de etiquetas inválido: {0}")]
    LabelOrder(String),
    #[error("configuración inválida: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
