pub mod rows;
pub mod walk;

pub use rows::{GroupRows, Row};
pub use walk::discover_files;
