//! Records, errors and the inspection workflow for dialscope.
//!
//! No file, network or terminal I/O happens here. The history backend and
//! the external collaborators (number lookup, geolocation, speech, admin
//! credential check) are traits implemented in the other workspace crates.

// Trait futures carry explicit `Send` bounds where they are declared.
#![allow(async_fn_in_trait)]

pub mod admin;
pub mod error;
pub mod record;
pub mod service;
pub mod store;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
