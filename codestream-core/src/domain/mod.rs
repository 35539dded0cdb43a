//! Core domain types
//!
//! Remote resources mirrored locally as plain records. The service is the
//! source of truth; these only live for the duration of one command.

pub mod custom_integration;
pub mod execution;
pub mod pipeline;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
