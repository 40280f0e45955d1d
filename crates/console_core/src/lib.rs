//! Admin console logic independent of rendering: form stores, validation,
//! submission orchestration, speaker ordering and delete confirmation.

pub mod delete_flow;
pub mod forms;
pub mod navigation;
pub mod orchestrator;
pub mod page;
pub mod reorder;
pub mod sanitize;
pub mod store;
pub mod validation;

pub use navigation::{NavigationHub, Navigator, Route};
pub use orchestrator::{submit, FormSubmission, SubmitOutcome};
pub use store::{FieldErrors, FormState};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
