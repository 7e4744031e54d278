//! Approval gate for donor profiles and receiver requests.

mod state;
mod workflow;

pub use state::{Actor, ApprovalAction, ApprovalState};
pub use workflow::{ApprovalWorkflow, Reviewable};
