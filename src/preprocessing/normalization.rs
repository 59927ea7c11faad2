//! Стандартизация признаков: (x - mean) / std

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Порог, ниже которого std считается нулевым
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some() && self.scale.is_some()
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PrepError::EmptyDataset);
        }

        // Среднее и стандартное отклонение (ddof = 0) по каждому признаку,
        // пропуски (NaN) не учитываются
        let n_features = X.ncols();
        let mut mean = Array1::from_elem(n_features, f64::NAN);
        let mut scale = Array1::from_elem(n_features, 1.0);
        let mut missing = 0;
        for (j, column) in X.axis_iter(Axis(1)).enumerate() {
            let observed: Array1<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
            missing += column.len() - observed.len();
            if let Some(m) = observed.mean() {
                mean[j] = m;
                scale[j] = observed.std(0.0);
            }
        }
        if missing > 0 {
            tracing::warn!("{} missing value(s) ignored while fitting", missing);
        }

        // Постоянный признак: делим на 1, а не на 0
        let mut constant = 0;
        for val in scale.iter_mut() {
            if *val < MIN_SCALE {
                *val = 1.0;
                constant += 1;
            }
        }
        if constant > 0 {
            tracing::warn!("{} constant feature(s) left unscaled", constant);
        }

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => (mean, scale),
            _ => return Err(PrepError::NotFitted),
        };

        if X.ncols() != mean.len() {
            return Err(PrepError::SchemaMismatch(format!(
                "scaler was fitted on {} features, got {}",
                mean.len(),
                X.ncols()
            )));
        }

        let mut scaled = X.to_owned();
        scaled -= mean;
        scaled /= scale;
        Ok(scaled)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }
}
