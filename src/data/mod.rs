/// Чтение и запись табличных данных

pub mod loader;
pub mod writer;

pub use loader::{load_cancer, load_raw, relabel_class, relabel_classes};
pub use writer::write_csv;
