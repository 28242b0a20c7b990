pub mod models;
pub mod snapshot;
pub mod store;

pub use store::{GroupStore, ProcessOutcome, Processor};
