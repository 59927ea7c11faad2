//! Запись наборов данных в CSV

use std::path::Path;

use csv::Writer;

use crate::error::{PrepError, Result};
use crate::types::Dataset;

/// Первая колонка — индекс строки без имени, затем колонки датасета
pub fn write_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let csv_err = |source| PrepError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = Writer::from_path(path).map_err(csv_err)?;

    let mut header = vec![String::new()];
    header.extend(dataset.column_names().into_iter().map(str::to_string));
    writer.write_record(&header).map_err(csv_err)?;

    for (row, label) in dataset.index().iter().enumerate() {
        let mut record = Vec::with_capacity(dataset.n_columns() + 1);
        record.push(label.to_string());
        for column in dataset.columns() {
            record.push(column.values.format_value(row));
        }
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Wrote {} rows to {:?}", dataset.n_rows(), path);
    Ok(())
}
