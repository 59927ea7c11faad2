//! Загрузка исходного CSV без заголовка

use std::path::Path;

use csv::ReaderBuilder;

use crate::config::{CANCER_COLUMNS, CLASS_COLUMN, ID_COLUMN};
use crate::error::{PrepError, Result};
use crate::types::{Column, Dataset};

/// Читает CSV без заголовка; имена колонок задаются снаружи.
///
/// Колонка считается числовой, если каждое непустое значение в ней парсится
/// как `f64`; пропуски (см. `MISSING_TOKENS`) становятся `NaN`.
pub fn load_raw<P: AsRef<Path>>(path: P, column_names: &[&str]) -> Result<Dataset> {
    let path = path.as_ref();
    let csv_err = |source| PrepError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); column_names.len()];

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        if record.len() != column_names.len() {
            return Err(PrepError::FieldCount {
                path: path.to_path_buf(),
                line: line as u64 + 1,
                expected: column_names.len(),
                found: record.len(),
            });
        }
        for (values, field) in raw.iter_mut().zip(record.iter()) {
            values.push(field.trim().to_string());
        }
    }

    if raw.first().map_or(true, |values| values.is_empty()) {
        return Err(PrepError::EmptyInput(path.to_path_buf()));
    }

    let columns = column_names
        .iter()
        .zip(raw)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    Dataset::new(columns)
}

/// Значения, которые читаются как пропуск
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_numeric(value: &str) -> Option<f64> {
    if MISSING_TOKENS.contains(&value) {
        Some(f64::NAN)
    } else {
        value.parse::<f64>().ok()
    }
}

fn infer_column(name: &str, values: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = values.iter().map(|v| parse_numeric(v)).collect();
    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::text(name, values),
    }
}

/// `M` -> `Malignant`, `B` -> `Benign`, прочие значения без изменений
pub fn relabel_class(label: &str) -> String {
    match label {
        "M" => "Malignant".to_string(),
        "B" => "Benign".to_string(),
        other => other.to_string(),
    }
}

pub fn relabel_classes(dataset: &mut Dataset, column: &str) -> Result<()> {
    dataset.map_text(column, relabel_class)
}

/// Загрузка датасета: фиксированная схема, без `id`, с читаемыми метками
pub fn load_cancer<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let mut cancer = load_raw(&path, &CANCER_COLUMNS)?;
    cancer.drop_column(ID_COLUMN)?;
    relabel_classes(&mut cancer, CLASS_COLUMN)?;

    tracing::info!(
        "Loaded {} rows x {} columns from {:?}",
        cancer.n_rows(),
        cancer.n_columns(),
        path.as_ref()
    );
    Ok(cancer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKind, ColumnValues};
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cancer_row(id: usize, label: &str) -> String {
        let features: Vec<String> = (0..30).map(|j| format!("{}.5", id + j)).collect();
        format!("{},{},{}\n", id, label, features.join(","))
    }

    #[test]
    fn test_relabel_known_and_unknown() {
        assert_eq!(relabel_class("M"), "Malignant");
        assert_eq!(relabel_class("B"), "Benign");
        assert_eq!(relabel_class("X"), "X");
        assert_eq!(relabel_class("m"), "m");
        assert_eq!(relabel_class(""), "");
    }

    #[test]
    fn test_load_raw_infers_types() {
        let file = write_file("1,a,2.5\n2,b,3\n");
        let ds = load_raw(file.path(), &["id", "label", "x"]).unwrap();

        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.kind("id").unwrap(), ColumnKind::Numeric);
        assert_eq!(ds.kind("label").unwrap(), ColumnKind::Text);
        assert_eq!(
            ds.column("x").unwrap().values,
            ColumnValues::Numeric(vec![2.5, 3.0])
        );
    }

    #[test]
    fn test_load_raw_missing_values_stay_numeric() {
        let file = write_file("1,a,2.5\n2,b,\n3,NA,NA\n4,c,4.0\n");
        let ds = load_raw(file.path(), &["id", "label", "x"]).unwrap();

        assert_eq!(ds.kind("x").unwrap(), ColumnKind::Numeric);
        match &ds.column("x").unwrap().values {
            ColumnValues::Numeric(v) => {
                assert_eq!(v[0], 2.5);
                assert!(v[1].is_nan());
                assert!(v[2].is_nan());
                assert_eq!(v[3], 4.0);
            }
            ColumnValues::Text(_) => panic!("x should be numeric"),
        }
        // В текстовой колонке маркер пропуска остается строкой
        assert_eq!(
            ds.column("label").unwrap().values,
            ColumnValues::Text(vec!["a".into(), "b".into(), "NA".into(), "c".into()])
        );
    }

    #[test]
    fn test_load_cancer_empty_feature_is_numeric() {
        let mut rows: Vec<String> = (0..10)
            .map(|i| cancer_row(900000 + i, if i % 2 == 0 { "M" } else { "B" }))
            .collect();
        // mean_radius пустой в четвертой строке
        rows[3] = rows[3].replacen(",900003.5,", ",,", 1);
        assert!(rows[3].contains(",B,,"));
        let file = write_file(&rows.concat());

        let ds = load_cancer(file.path()).unwrap();
        assert_eq!(ds.kind("mean_radius").unwrap(), ColumnKind::Numeric);
        assert_eq!(ds.numeric_column_names().len(), 30);
    }

    #[test]
    fn test_load_raw_rejects_wrong_field_count() {
        let file = write_file("1,a,2.5\n2,b\n");
        let err = load_raw(file.path(), &["id", "label", "x"]).unwrap_err();
        match err {
            PrepError::FieldCount { line, expected, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_raw_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_raw(dir.path().join("absent.csv"), &["a"]).unwrap_err();
        assert!(matches!(err, PrepError::Csv { .. }));
    }

    #[test]
    fn test_load_raw_empty_file() {
        let file = write_file("");
        let err = load_raw(file.path(), &["a"]).unwrap_err();
        assert!(matches!(err, PrepError::EmptyInput(_)));
    }

    #[test]
    fn test_load_cancer_drops_id_and_relabels() {
        let contents = [
            cancer_row(842302, "M"),
            cancer_row(842517, "B"),
            cancer_row(843786, "Q"),
        ]
        .concat();
        let file = write_file(&contents);

        let ds = load_cancer(file.path()).unwrap();
        assert_eq!(ds.n_columns(), 31);
        assert!(ds.column("id").is_err());
        assert_eq!(ds.column_names()[0], "class");
        assert_eq!(
            ds.column("class").unwrap().values,
            ColumnValues::Text(vec!["Malignant".into(), "Benign".into(), "Q".into()])
        );
        assert_eq!(ds.numeric_column_names().len(), 30);
        assert_eq!(ds.index(), &[0, 1, 2]);
    }
}
