//! Pipeline stages.
//!
//! Each stage is a free function: inputs come in as arguments, outputs
//! go back to the caller and into the catalog under their registered
//! names. The stages know nothing about ordering; sequencing and state
//! live in [`crate::pipeline`].

mod extract;
mod preprocess;
mod report;
mod train;

pub use extract::extract_data;
pub use preprocess::clean_data;
pub use report::generate_report;
pub use train::train_model;
