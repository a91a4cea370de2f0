mod csv;
mod format;

pub use crate::output::csv::*;
pub use crate::output::format::*;
