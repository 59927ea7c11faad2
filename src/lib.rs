//! cancer-prep: разбиение и предобработка датасета рака молочной железы

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod preprocessing;
pub mod split;
pub mod types;

pub use config::PrepConfig;
pub use error::{PrepError, Result};
pub use pipeline::{run, PrepReport};
pub use preprocessing::*;
pub use split::{stratified_split, TrainTestSplit};
pub use types::*;
