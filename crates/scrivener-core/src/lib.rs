//! Shared error contract for the Scrivener HTTP surface

mod error;
mod failure;

pub use error::HttpError;
pub use failure::{Diagnostics, Failure, FailureBody};
