//! Конфигурация подготовки данных

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

pub const DEFAULT_TRAIN_SIZE: f64 = 0.70;
pub const DEFAULT_SEED: u64 = 522;

pub const ID_COLUMN: &str = "id";
pub const CLASS_COLUMN: &str = "class";

pub const TRAIN_FILE: &str = "cancer_train.csv";
pub const TEST_FILE: &str = "cancer_test.csv";
pub const PREPROCESSOR_FILE: &str = "cancer_preprocessor.pickle";
pub const SCALED_TRAIN_FILE: &str = "scaled_cancer_train.csv";
pub const SCALED_TEST_FILE: &str = "scaled_cancer_test.csv";

/// Схема исходного файла (заголовка в файле нет)
pub const CANCER_COLUMNS: [&str; 32] = [
    ID_COLUMN,
    CLASS_COLUMN,
    "mean_radius",
    "mean_texture",
    "mean_perimeter",
    "mean_area",
    "mean_smoothness",
    "mean_compactness",
    "mean_concavity",
    "mean_concave_points",
    "mean_symmetry",
    "mean_fractal_dimension",
    "se_radius",
    "se_texture",
    "se_perimeter",
    "se_area",
    "se_smoothness",
    "se_compactness",
    "se_concavity",
    "se_concave_points",
    "se_symmetry",
    "se_fractal_dimension",
    "max_radius",
    "max_texture",
    "max_perimeter",
    "max_area",
    "max_smoothness",
    "max_compactness",
    "max_concavity",
    "max_concave_points",
    "max_symmetry",
    "max_fractal_dimension",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    pub raw_data: PathBuf,
    pub write_to: PathBuf,
    #[serde(default = "default_train_size")]
    pub train_size: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_train_size() -> f64 { DEFAULT_TRAIN_SIZE }
fn default_seed() -> u64 { DEFAULT_SEED }

impl PrepConfig {
    pub fn new(raw_data: impl Into<PathBuf>, write_to: impl Into<PathBuf>) -> Self {
        Self {
            raw_data: raw_data.into(),
            write_to: write_to.into(),
            train_size: DEFAULT_TRAIN_SIZE,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_train_size(mut self, train_size: f64) -> Self {
        self.train_size = train_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Проверка параметров до чтения/записи файлов
    pub fn validate(&self) -> Result<()> {
        if !(self.train_size > 0.0 && self.train_size < 1.0) {
            return Err(PrepError::InvalidTrainSize(self.train_size));
        }
        if !self.write_to.is_dir() {
            return Err(PrepError::OutputDir(self.write_to.clone()));
        }
        Ok(())
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.write_to.join(file_name)
    }
}
