//! Полный прогон: загрузка -> разбиение -> масштабирование -> запись

use std::collections::BTreeMap;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::{
    PrepConfig, CLASS_COLUMN, PREPROCESSOR_FILE, SCALED_TEST_FILE, SCALED_TRAIN_FILE, TEST_FILE,
    TRAIN_FILE,
};
use crate::data::{load_cancer, write_csv};
use crate::error::Result;
use crate::preprocessing::{ColumnTransformer, Remainder};
use crate::split::stratified_split;

/// Итог прогона, печатается бинарником в stdout
#[derive(Debug, Clone, Serialize)]
pub struct PrepReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub train_classes: BTreeMap<String, usize>,
    pub test_classes: BTreeMap<String, usize>,
    pub scaled_columns: Vec<String>,
    pub files: Vec<PathBuf>,
}

pub fn run(config: &PrepConfig) -> Result<PrepReport> {
    config.validate()?;

    let cancer = load_cancer(&config.raw_data)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let split = stratified_split(&cancer, config.train_size, CLASS_COLUMN, &mut rng)?;

    let mut files = Vec::with_capacity(5);

    let path = config.output_path(TRAIN_FILE);
    write_csv(&split.train, &path)?;
    files.push(path);

    let path = config.output_path(TEST_FILE);
    write_csv(&split.test, &path)?;
    files.push(path);

    // Сохраняется уже обученный трансформер
    let mut preprocessor = ColumnTransformer::new(Remainder::Passthrough);
    preprocessor.fit(&split.train)?;

    let path = config.output_path(PREPROCESSOR_FILE);
    preprocessor.save(&path)?;
    files.push(path);

    let scaled_train = preprocessor.transform(&split.train)?;
    let scaled_test = preprocessor.transform(&split.test)?;

    let path = config.output_path(SCALED_TRAIN_FILE);
    write_csv(&scaled_train, &path)?;
    files.push(path);

    let path = config.output_path(SCALED_TEST_FILE);
    write_csv(&scaled_test, &path)?;
    files.push(path);

    Ok(PrepReport {
        n_rows: cancer.n_rows(),
        n_train: split.train.n_rows(),
        n_test: split.test.n_rows(),
        train_classes: split.train.value_counts(CLASS_COLUMN)?,
        test_classes: split.test.value_counts(CLASS_COLUMN)?,
        scaled_columns: preprocessor.scaled_columns().to_vec(),
        files,
    })
}
