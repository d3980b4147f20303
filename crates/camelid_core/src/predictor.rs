use crate::error::{Error, Result};
use crate::preprocess::Preprocessor;
use crate::probabilities::Probabilities;
use crate::species::Species;
use image::DynamicImage;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

pub const DEFAULT_CONCENTRATION: f32 = 15.0;

/// Where a probability vector came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionSource {
    Model { path: PathBuf },
    Simulation,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionSource::Model { path } => write!(f, "modelo {}", path.display()),
            PredictionSource::Simulation => f.write_str("simulación"),
        }
    }
}

/// Produces a probability vector over [`Species::ALL`] for one image.
pub trait Predictor: Send + Sync {
    fn predict(&self, image: &DynamicImage) -> Result<Probabilities>;

    /// Prediction for the `index`-th image of a batch.
    ///
    /// Implementations with internal randomness must make the result depend on
    /// `index` only, never on the order in which batch items are processed.
    fn predict_at(&self, image: &DynamicImage, index: u64) -> Result<Probabilities> {
        let _ = index;
        self.predict(image)
    }

    fn source(&self) -> PredictionSource;
}

/// Stand-in for a trained model: a symmetric Dirichlet draw.
///
/// The image is still run through the preprocessor so that the simulated path
/// exercises the same input handling as the model path.
pub struct DirichletSimulator {
    gamma: Gamma<f32>,
    concentration: f32,
    seed: Option<u64>,
    preprocessor: Preprocessor,
    rng: Mutex<StdRng>,
}

impl DirichletSimulator {
    pub fn new(concentration: f32, seed: Option<u64>) -> Result<Self> {
        if !concentration.is_finite() || concentration <= 0.0 {
            return Err(Error::Simulation(format!(
                "la concentración debe ser positiva, es {concentration}"
            )));
        }
        let gamma =
            Gamma::new(concentration, 1.0).map_err(|e| Error::Simulation(e.to_string()))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            gamma,
            concentration,
            seed,
            preprocessor: Preprocessor::default(),
            rng: Mutex::new(rng),
        })
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn concentration(&self) -> f32 {
        self.concentration
    }

    /// Draws one vector from Dirichlet(α, α, α, α) via normalized gamma samples.
    pub fn sample(&self) -> Result<Probabilities> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::Simulation("generador aleatorio envenenado".to_string()))?;
        self.draw(&mut *rng)
    }

    /// Draw for batch item `index`; with a seed it depends only on seed and index.
    pub fn sample_at(&self, index: u64) -> Result<Probabilities> {
        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(item_seed(seed, index));
                self.draw(&mut rng)
            }
            None => self.sample(),
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Probabilities> {
        let mut draws = [0f32; 4];
        for d in draws.iter_mut() {
            *d = self.gamma.sample(rng);
        }
        let sum: f32 = draws.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            // Only reachable for tiny concentrations where every draw underflows.
            return Probabilities::new(&[0.25; 4]);
        }
        Probabilities::new(&draws.map(|d| d / sum))
    }
}

/// SplitMix64 step over `seed + index`, so neighbouring indices get unrelated streams.
fn item_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl Predictor for DirichletSimulator {
    fn predict(&self, image: &DynamicImage) -> Result<Probabilities> {
        let tensor = self.preprocessor.to_tensor(image);
        tracing::debug!(shape = ?tensor.shape(), "simulating prediction");
        self.sample()
    }

    fn predict_at(&self, image: &DynamicImage, index: u64) -> Result<Probabilities> {
        let tensor = self.preprocessor.to_tensor(image);
        tracing::debug!(shape = ?tensor.shape(), index, "simulating batch prediction");
        self.sample_at(index)
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Simulation
    }
}

/// Maps a model's label order onto [`Species::ALL`].
///
/// `order[i]` is the species of the model's i-th output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    order: Vec<Species>,
}

impl LabelMap {
    pub fn new(order: Vec<Species>) -> Result<Self> {
        let mut seen = order.clone();
        seen.sort();
        seen.dedup();
        if order.len() != Species::ALL.len() || seen.len() != Species::ALL.len() {
            return Err(Error::LabelOrder(format!(
                "las etiquetas deben cubrir las {} especies una vez: {order:?}",
                Species::ALL.len()
            )));
        }
        Ok(Self { order })
    }

    pub fn canonical() -> Self {
        Self {
            order: Species::ALL.to_vec(),
        }
    }

    pub fn order(&self) -> &[Species] {
        &self.order
    }

    /// Reorders model scores into canonical species order.
    pub fn reorder(&self, scores: &[f32]) -> Result<Vec<f32>> {
        if scores.len() != self.order.len() {
            return Err(Error::InvalidProbabilities(format!(
                "el modelo produjo {} salidas para {} etiquetas",
                scores.len(),
                self.order.len()
            )));
        }
        let mut out = vec![0.0; Species::ALL.len()];
        for (score, species) in scores.iter().zip(&self.order) {
            out[species.index()] = *score;
        }
        Ok(out)
    }
}
