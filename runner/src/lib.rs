//! Async host for `referential-core`.
//!
//! # Overview
//! The core describes calls as data. This crate runs them: it sends each
//! request through a [`Transport`] and applies the resulting actions and
//! notifications to a caller-supplied `Store` and `Notifier`.
//!
//! # Design
//! - [`Runner`] owns the store and notifier and takes `&mut self` per call,
//!   so dispatch order within a call matches the build/parse order exactly.
//! - [`ReqwestTransport`] returns every HTTP status as data; status
//!   interpretation stays in the core.
//! - [`RunnerConfig`] reads the backend origin and base path from the
//!   environment once at startup.

pub mod config;
pub mod runner;
pub mod transport;

pub use config::RunnerConfig;
pub use runner::Runner;
pub use transport::{ReqwestTransport, Transport};
