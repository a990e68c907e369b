//! Catalog controller

mod controller;
pub mod errors;

pub use controller::*;
pub use errors::{SaveError, SubmitError};
