/// Модуль предобработки данных

pub mod column_transformer;
pub mod normalization;

pub use column_transformer::{ColumnTransformer, Remainder};
pub use normalization::StandardScaler;
