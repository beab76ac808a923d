//! Model store: owns the yield and health regressors
//!
//! Models are trained from synthetic data, persisted as JSON artifacts at
//! fixed paths under the model directory and loaded once into memory.
//! `ensure_trained` and `train` run under one mutex, so concurrent first
//! callers train a single pair. Artifacts are written to a temporary file
//! and renamed into place, so a reader never sees a half-written model.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::{FeatureVector, TrainingSample, FEATURE_COUNT};

use super::error::ModelError;
use super::forest::{ForestParams, RandomForestRegressor};
use super::synthetic::{SyntheticDataGenerator, DEFAULT_SAMPLE_COUNT, DEFAULT_SEED};
use super::tree::TreeParams;

/// The two regression targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelTarget {
    Yield,
    Health,
}

impl ModelTarget {
    pub fn file_name(self) -> &'static str {
        match self {
            ModelTarget::Yield => "yield_model.json",
            ModelTarget::Health => "health_model.json",
        }
    }
}

impl std::fmt::Display for ModelTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTarget::Yield => write!(f, "yield"),
            ModelTarget::Health => write!(f, "health"),
        }
    }
}

/// Fixed artifact locations under the model directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub dir: PathBuf,
    pub yield_model: PathBuf,
    pub health_model: PathBuf,
}

impl ModelPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            yield_model: dir.join(ModelTarget::Yield.file_name()),
            health_model: dir.join(ModelTarget::Health.file_name()),
            dir,
        }
    }

    pub fn path(&self, target: ModelTarget) -> &Path {
        match target {
            ModelTarget::Yield => &self.yield_model,
            ModelTarget::Health => &self.health_model,
        }
    }

    /// Both artifacts are present on disk
    pub fn all_exist(&self) -> bool {
        self.yield_model.is_file() && self.health_model.is_file()
    }
}

/// Dataset and forest settings used by [`ModelStore::train`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingSettings {
    pub sample_count: usize,
    pub seed: u64,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: Option<usize>,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            seed: DEFAULT_SEED,
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

impl TrainingSettings {
    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                max_features: self.max_features,
            },
            bootstrap: true,
            seed: self.seed,
        }
    }
}

/// A loaded yield/health model pair
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPair {
    pub yield_model: RandomForestRegressor,
    pub health_model: RandomForestRegressor,
}

impl ModelPair {
    /// Raw (unrounded) yield and health predictions
    pub fn predict(&self, features: &FeatureVector) -> (f64, f64) {
        let row = features.to_array();
        (self.yield_model.predict(&row), self.health_model.predict(&row))
    }
}

/// On-disk layout of one model
#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    target: ModelTarget,
    feature_count: usize,
    /// SHA-256 of the serialized forest
    checksum: String,
    forest: RandomForestRegressor,
}

/// Trains, persists and serves the yield and health models
pub struct ModelStore {
    paths: ModelPaths,
    settings: TrainingSettings,
    loaded: RwLock<Option<Arc<ModelPair>>>,
    bootstrap: Mutex<()>,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>, settings: TrainingSettings) -> Self {
        Self {
            paths: ModelPaths::new(dir),
            settings,
            loaded: RwLock::new(None),
            bootstrap: Mutex::new(()),
        }
    }

    pub fn paths(&self) -> &ModelPaths {
        &self.paths
    }

    /// Whether a model pair is held in memory
    pub fn is_loaded(&self) -> bool {
        self.loaded.read().is_some()
    }

    /// Train a fresh model pair, persist it and make it the active pair.
    pub fn train(&self) -> Result<(), ModelError> {
        let _guard = self.bootstrap.lock();
        self.train_locked()
    }

    /// Train if either persisted model is missing, otherwise make sure the
    /// persisted pair is loaded.
    pub fn ensure_trained(&self) -> Result<(), ModelError> {
        let _guard = self.bootstrap.lock();
        if !self.paths.all_exist() {
            tracing::info!(
                dir = %self.paths.dir.display(),
                "Model artifacts missing, training new models"
            );
            return self.train_locked();
        }
        if !self.is_loaded() {
            tracing::debug!(dir = %self.paths.dir.display(), "Model artifacts present");
            self.load_locked()?;
        }
        Ok(())
    }

    /// Return the active model pair, loading it from disk on first use.
    pub fn load(&self) -> Result<Arc<ModelPair>, ModelError> {
        if let Some(pair) = self.loaded.read().as_ref() {
            return Ok(Arc::clone(pair));
        }

        let _guard = self.bootstrap.lock();
        self.load_locked()
    }

    /// Predict `(yield, health)` for an encoded observation.
    pub fn predict(&self, features: &FeatureVector) -> Result<(f64, f64), ModelError> {
        let models = self.load()?;
        Ok(models.predict(features))
    }

    fn load_locked(&self) -> Result<Arc<ModelPair>, ModelError> {
        if let Some(pair) = self.loaded.read().as_ref() {
            return Ok(Arc::clone(pair));
        }

        let pair = Arc::new(ModelPair {
            yield_model: self.read_artifact(ModelTarget::Yield)?,
            health_model: self.read_artifact(ModelTarget::Health)?,
        });
        *self.loaded.write() = Some(Arc::clone(&pair));
        tracing::info!(dir = %self.paths.dir.display(), "Loaded model pair");
        Ok(pair)
    }

    fn train_locked(&self) -> Result<(), ModelError> {
        let started = Instant::now();
        let settings = self.settings;
        tracing::info!(
            samples = settings.sample_count,
            trees = settings.n_estimators,
            seed = settings.seed,
            "Training yield and health models"
        );

        let dataset = SyntheticDataGenerator::new(settings.seed).generate(settings.sample_count);
        let (rows, yields, healths) = split_targets(&dataset);
        let params = settings.forest_params();

        let yield_model = RandomForestRegressor::fit(&rows, &yields, &params)
            .map_err(|e| ModelError::TrainingFailed(anyhow!(e).context("fitting yield model")))?;
        let health_model = RandomForestRegressor::fit(&rows, &healths, &params)
            .map_err(|e| ModelError::TrainingFailed(anyhow!(e).context("fitting health model")))?;

        fs::create_dir_all(&self.paths.dir)
            .with_context(|| format!("creating model directory {}", self.paths.dir.display()))
            .map_err(ModelError::TrainingFailed)?;
        self.persist_pair(&yield_model, &health_model)
            .map_err(ModelError::TrainingFailed)?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            yield_nodes = yield_model.total_nodes(),
            health_nodes = health_model.total_nodes(),
            dir = %self.paths.dir.display(),
            "Models trained successfully"
        );

        *self.loaded.write() = Some(Arc::new(ModelPair {
            yield_model,
            health_model,
        }));
        Ok(())
    }

    /// Stage both artifacts before renaming either, so a failed write never
    /// leaves a mixed pair on disk.
    fn persist_pair(
        &self,
        yield_model: &RandomForestRegressor,
        health_model: &RandomForestRegressor,
    ) -> anyhow::Result<()> {
        let staged = [
            (ModelTarget::Yield, yield_model),
            (ModelTarget::Health, health_model),
        ];
        let mut written = Vec::with_capacity(staged.len());
        for (target, forest) in staged {
            match self.stage_artifact(target, forest) {
                Ok(tmp) => written.push((target, tmp)),
                Err(e) => {
                    for (_, tmp) in &written {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }

        for (target, tmp) in written {
            let path = self.paths.path(target);
            fs::rename(&tmp, path)
                .with_context(|| format!("moving {} into place", path.display()))?;
            tracing::debug!(path = %path.display(), "Persisted {} model", target);
        }
        Ok(())
    }

    /// Serialize one model next to its final path and return the temp path
    fn stage_artifact(
        &self,
        target: ModelTarget,
        forest: &RandomForestRegressor,
    ) -> anyhow::Result<PathBuf> {
        let artifact = ModelArtifact {
            target,
            feature_count: forest.n_features(),
            checksum: checksum(forest)?,
            forest: forest.clone(),
        };
        let bytes = serde_json::to_vec(&artifact)
            .with_context(|| format!("serializing {} model", target))?;

        let tmp = staging_path(self.paths.path(target));
        fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        Ok(tmp)
    }

    fn read_artifact(&self, target: ModelTarget) -> Result<RandomForestRegressor, ModelError> {
        let path = self.paths.path(target);
        parse_artifact(path, target).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %format!("{:#}", e), "Failed to load {} model", target);
            ModelError::unavailable(path, e)
        })
    }
}

fn parse_artifact(path: &Path, target: ModelTarget) -> anyhow::Result<RandomForestRegressor> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).context("parsing model artifact")?;

    if artifact.target != target {
        return Err(anyhow!(
            "artifact holds the {} model, expected {}",
            artifact.target,
            target
        ));
    }
    if artifact.feature_count != FEATURE_COUNT || artifact.forest.n_features() != FEATURE_COUNT {
        return Err(anyhow!(
            "model expects {} features, encoder produces {}",
            artifact.forest.n_features(),
            FEATURE_COUNT
        ));
    }
    if checksum(&artifact.forest)? != artifact.checksum {
        return Err(anyhow!("checksum mismatch"));
    }
    artifact
        .forest
        .validate()
        .map_err(|e| anyhow!(e).context("invalid tree structure"))?;

    Ok(artifact.forest)
}

/// Temporary file a model is written to before it is renamed into place
pub fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn checksum(forest: &RandomForestRegressor) -> anyhow::Result<String> {
    let bytes = serde_json::to_vec(forest).context("serializing forest for checksum")?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

fn split_targets(dataset: &[TrainingSample]) -> (Vec<Vec<f64>>, Vec<f64>, Vec<f64>) {
    let rows = dataset
        .iter()
        .map(|s| s.features.to_array().to_vec())
        .collect();
    let yields = dataset.iter().map(|s| s.yield_tonnes).collect();
    let healths = dataset.iter().map(|s| s.health_score).collect();
    (rows, yields, healths)
}
