//! Dataset loading and the combined wine table

mod loader;
mod table;

pub use loader::{load_predictor_rows, load_wine_datasets, read_wine_file};
pub use table::WineTable;
