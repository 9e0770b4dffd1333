pub mod selection;
pub mod submission;

pub use selection::SelectionTracker;
pub use submission::{SubmissionCoordinator, SubmissionOutcome};
