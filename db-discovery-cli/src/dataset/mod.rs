//! Tabular datasets handed from the readers to the loader

mod table;
mod value;

pub use table::*;
pub use value::*;
