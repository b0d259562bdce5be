//! Core library for the stock-locator command line application.
//!
//! The library finds inventory records spread over the sheets of a
//! warehouse workbook and renders them as paginated PDF reports. Locator
//! codes are parsed in [`locator`], records are modelled in [`model`],
//! workbook adapters live under [`io`], the queries in [`query`], the report
//! layout and PDF backend in [`report`], and the user-facing operations in
//! [`service`].

pub mod error;
pub mod io;
pub mod locator;
pub mod model;
pub mod query;
pub mod report;
pub mod service;

pub use error::{LocatorError, Result};
pub use service::Session;
