//! Pre-made transactions.

#![cfg(feature = "transactions")]

mod dispatch_workflow;
mod fetch_workflows;
mod resolve_ref;
mod resolve_workflow;

pub use dispatch_workflow::*;
pub use fetch_workflows::*;
pub use resolve_ref::*;
pub use resolve_workflow::*;
