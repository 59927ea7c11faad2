//! Column transformer: стандартизация числовых колонок и политика для остальных

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::preprocessing::StandardScaler;
use crate::types::{Column, Dataset};

/// Что делать с колонками, которые не масштабируются
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remainder {
    Passthrough,
    Drop,
}

/// Масштабирует все числовые колонки (выбранные по типу при `fit`).
///
/// На выходе сначала идут масштабированные колонки в исходном порядке,
/// затем остальные (при `Remainder::Passthrough`). Имена колонок и индекс
/// строк сохраняются.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    scaler: StandardScaler,
    remainder: Remainder,
    scaled_columns: Vec<String>,
    remainder_columns: Vec<String>,
}

impl ColumnTransformer {
    pub fn new(remainder: Remainder) -> Self {
        Self {
            scaler: StandardScaler::new(),
            remainder,
            scaled_columns: Vec::new(),
            remainder_columns: Vec::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.scaler.is_fitted()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn remainder(&self) -> Remainder {
        self.remainder
    }

    pub fn scaled_columns(&self) -> &[String] {
        &self.scaled_columns
    }

    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let numeric = dataset.numeric_column_names();
        if numeric.is_empty() {
            return Err(PrepError::NoNumericColumns);
        }

        let x = dataset.numeric_matrix(&numeric)?;
        self.scaler.fit(&x)?;

        self.remainder_columns = dataset
            .column_names()
            .into_iter()
            .filter(|name| !numeric.iter().any(|n| n.as_str() == *name))
            .map(str::to_string)
            .collect();
        self.scaled_columns = numeric;

        tracing::info!(
            "Fitted scaler on {} rows: {} scaled column(s), {} remainder column(s)",
            dataset.n_rows(),
            self.scaled_columns.len(),
            self.remainder_columns.len()
        );
        Ok(())
    }

    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        if !self.is_fitted() {
            return Err(PrepError::NotFitted);
        }

        let x = dataset.numeric_matrix(&self.scaled_columns)?;
        let scaled = self.scaler.transform(&x)?;

        let mut columns: Vec<Column> = self
            .scaled_columns
            .iter()
            .zip(scaled.columns())
            .map(|(name, values)| Column::numeric(name.clone(), values.to_vec()))
            .collect();

        if self.remainder == Remainder::Passthrough {
            for name in &self.remainder_columns {
                let column = dataset.column(name).map_err(|_| {
                    PrepError::SchemaMismatch(format!("column '{}' is missing", name))
                })?;
                columns.push(column.clone());
            }
        }

        Dataset::with_index(dataset.index().to_vec(), columns)
    }

    pub fn fit_transform(&mut self, dataset: &Dataset) -> Result<Dataset> {
        self.fit(dataset)?;
        self.transform(dataset)
    }

    /// Имена выходных колонок в порядке `transform`
    pub fn feature_names_out(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scaled_columns.iter().map(String::as_str).collect();
        if self.remainder == Remainder::Passthrough {
            names.extend(self.remainder_columns.iter().map(String::as_str));
        }
        names
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(|source| {
            PrepError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!("Saved preprocessor (fitted: {}) to {:?}", self.is_fitted(), path);
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        bincode::deserialize_from(BufReader::new(file)).map_err(|source| PrepError::Serialize {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for ColumnTransformer {
    fn default() -> Self {
        Self::new(Remainder::Passthrough)
    }
}
