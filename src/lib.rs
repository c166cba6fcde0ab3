//! Batchlink - a batch URL shortener service
//!
//! Core functionality for the Batchlink service: short-code assignment with
//! collision handling, time-bounded link validity, click accounting and an
//! operational health snapshot, exposed over HTTP.
//!
//! # Architecture
//! - `storages`: mapping store backends and the click pipeline
//! - `services`: business logic and HTTP handlers
//! - `config`: environment configuration
//! - `errors`: crate-wide error taxonomy
//! - `utils`: code generation and URL validation

pub mod config;
pub mod errors;
pub mod logging;
pub mod services;
pub mod storages;
pub mod utils;
