//! Concrete collaborators for the dialscope inspection workflow.
//!
//! - [`lookup::PrefixLookup`] — numbering-plan lookup backed by the
//!   `phonenumber` crate and a prefix metadata table
//! - [`geo::IpInfoGeo`] — caller location from an IP geolocation endpoint
//! - [`speech::Speech`] — spoken summaries through a local speech program
//! - [`auth`] — the admin credential checks

pub mod auth;
pub mod error;
pub mod geo;
pub mod lookup;
pub mod metadata;
pub mod speech;

pub use error::{Error, Result};
