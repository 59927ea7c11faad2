//! Табличные данные: колонки с типом и индекс строк

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Text(_) => ColumnKind::Text,
        }
    }

    /// Значение ячейки в том виде, в каком оно пишется в CSV:
    /// вещественные всегда с дробной частью (`1001.0`), пропуск — пустая строка
    pub fn format_value(&self, row: usize) -> String {
        match self {
            ColumnValues::Numeric(v) if v[row].is_nan() => String::new(),
            ColumnValues::Numeric(v) => format!("{:?}", v[row]),
            ColumnValues::Text(v) => v[row].clone(),
        }
    }

    fn take(&self, positions: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Numeric(v) => {
                ColumnValues::Numeric(positions.iter().map(|&p| v[p]).collect())
            }
            ColumnValues::Text(v) => {
                ColumnValues::Text(positions.iter().map(|&p| v[p].clone()).collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Text(values),
        }
    }
}

/// Набор записей с фиксированной схемой.
///
/// `index` хранит номер строки в исходном файле и сохраняется при
/// разбиении и масштабировании.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    index: Vec<usize>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Индекс по умолчанию: 0..n
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        Self::with_index((0..n_rows).collect(), columns)
    }

    pub fn with_index(index: Vec<usize>, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != index.len() {
                return Err(PrepError::SchemaMismatch(format!(
                    "column '{}' has {} rows, index has {}",
                    column.name,
                    column.values.len(),
                    index.len()
                )));
            }
        }
        Ok(Self { index, columns })
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))
    }

    pub fn kind(&self, name: &str) -> Result<ColumnKind> {
        Ok(self.column(name)?.values.kind())
    }

    /// Числовые колонки определяются по типу, а не по списку имен
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.values.kind() == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let pos = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))?;
        Ok(self.columns.remove(pos))
    }

    /// Применяет `f` к текстовой колонке; числовая колонка не меняется
    pub fn map_text<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))?;

        if let ColumnValues::Text(values) = &mut column.values {
            for value in values.iter_mut() {
                *value = f(value.as_str());
            }
        }
        Ok(())
    }

    /// Значения колонки как строковые ключи (для стратификации)
    pub fn label_keys(&self, name: &str) -> Result<Vec<String>> {
        let column = self.column(name)?;
        Ok((0..self.n_rows())
            .map(|row| column.values.format_value(row))
            .collect())
    }

    pub fn value_counts(&self, name: &str) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for key in self.label_keys(name)? {
            *counts.entry(key).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Подмножество строк по позициям; метки индекса переносятся как есть
    pub fn take(&self, positions: &[usize]) -> Dataset {
        Dataset {
            index: positions.iter().map(|&p| self.index[p]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values.take(positions),
                })
                .collect(),
        }
    }

    /// Матрица n_rows x names.len() из числовых колонок
    pub fn numeric_matrix(&self, names: &[String]) -> Result<Array2<f64>> {
        let mut matrix = Array2::zeros((self.n_rows(), names.len()));
        for (j, name) in names.iter().enumerate() {
            let column = self.column(name).map_err(|_| {
                PrepError::SchemaMismatch(format!("column '{}' is missing", name))
            })?;
            match &column.values {
                ColumnValues::Numeric(values) => {
                    for (i, value) in values.iter().enumerate() {
                        matrix[[i, j]] = *value;
                    }
                }
                ColumnValues::Text(_) => {
                    return Err(PrepError::SchemaMismatch(format!(
                        "column '{}' is not numeric",
                        name
                    )));
                }
            }
        }
        Ok(matrix)
    }
}
