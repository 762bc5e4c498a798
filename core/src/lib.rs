//! Referential action core for the admin console's REST backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Parsing yields an `Outcome`:
//! the call's result plus the store actions and notifications it calls for.
//! Nothing is dispatched from here; the host applies outcomes to its own
//! `Store` and `Notifier`.
//!
//! # Design
//! - `ReferentialClient` is stateless. It holds only the `BasePath` resolved
//!   at startup and injected by the host.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and every side effect is inspectable data.
//! - Reads and deletes surface failures as `ApiError`. Creates and updates
//!   surface them as an `ErrorShape` ready for inline form errors.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod form_error;
pub mod http;
pub mod schema;
pub mod search;

pub use action::{Action, ActionType, DeletedEntity, Notification, Notifier, Outcome, Prepared, Store};
pub use client::{ReferentialClient, Reply};
pub use config::BasePath;
pub use error::ApiError;
pub use form_error::{build_error, ErrorShape, FORM_ERROR};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use schema::Schema;
pub use search::{
    augment_property_schemas, entity_class, player_injector_filter, FilterValues, PropertySchema, SearchOption,
    SearchTarget,
};
