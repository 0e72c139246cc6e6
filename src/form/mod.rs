pub mod submission;
pub mod export;

pub use submission::{PreferenceSubmission, validate_submission};
pub use export::export_grid_csv;
