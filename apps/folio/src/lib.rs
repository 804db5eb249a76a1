//! Portfolio generation status workflow.
//!
//! The client side (`workflow`) tracks one background generation: a synthetic
//! progress presenter and a status poller share one progress state, and the
//! poller redirects once the backend reports completion. The server side
//! (`status`, `routes`) keeps the statuses those pollers read.

pub mod config;
pub mod errors;
pub mod routes;
pub mod state;
pub mod status;
pub mod workflow;
