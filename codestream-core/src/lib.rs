//! Code Stream Core
//!
//! Core types shared by the Code Stream client and CLI.
//!
//! This crate contains:
//! - Domain types: remote resources mirrored locally (Pipeline, Execution, etc.)
//! - DTOs: request/response bodies and envelopes exchanged with the service
//! - Query building for the service's OData-style list endpoints

pub mod domain;
pub mod dto;
pub mod error;
pub mod query;

pub use error::{Error, Result};
