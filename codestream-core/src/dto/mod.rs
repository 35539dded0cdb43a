//! Data Transfer Objects exchanged with the Code Stream service
//!
//! Request bodies, response envelopes and the YAML pipeline document used
//! by import/apply.

pub mod auth;
pub mod documents;
pub mod error;
pub mod execution;
pub mod pipeline;
