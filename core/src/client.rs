//! Stateless request builder and reply parser for referential calls.
//!
//! # Design
//! `ReferentialClient` holds only the resolved `BasePath`. Each operation is
//! split into a `build_*` method producing the request (plus the actions to
//! dispatch before sending it) and a `parse_*` method consuming the reply and
//! returning an `Outcome`: the result together with the actions and
//! notifications it calls for. The host performs the round-trip in between.
//!
//! Failure policy differs per verb. GET and DELETE failures come back as
//! `Err(ApiError)` for the caller to handle. PUT and POST failures come back
//! as `Err(ErrorShape)` so forms can render field errors inline.

use serde::Serialize;
use serde_json::Value;

use crate::action::{
    Action, DeletedEntity, Notification, Outcome, Prepared, ALREADY_EXISTS_MESSAGE,
    INTERNAL_ERROR_MESSAGE, UPDATED_MESSAGE,
};
use crate::config::BasePath;
use crate::error::ApiError;
use crate::form_error::ErrorShape;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::schema::Schema;
use crate::search::{augment_property_schemas, entity_class, PropertySchema, SearchOption, SearchTarget};

/// What the host got back: a response, or the transport failure that
/// prevented one.
pub type Reply = Result<HttpResponse, ApiError>;

/// Synchronous, stateless client for referential endpoints.
#[derive(Debug, Clone, Default)]
pub struct ReferentialClient {
    base_path: BasePath,
}

impl ReferentialClient {
    pub fn new(base_path: BasePath) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &BasePath {
        &self.base_path
    }

    pub fn build_uri(&self, uri: &str) -> String {
        self.base_path.join(uri)
    }

    // -----------------------------------------------------------------------
    // Passthrough calls: no normalization, no actions.
    // -----------------------------------------------------------------------

    pub fn build_simple_call(&self, uri: &str) -> HttpRequest {
        HttpRequest::bodyless(HttpMethod::Get, self.build_uri(uri))
    }

    pub fn build_simple_post_call<T: Serialize>(&self, uri: &str, data: &T) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, self.build_uri(uri), encode(data)?))
    }

    pub fn build_simple_put_call<T: Serialize>(&self, uri: &str, data: &T) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Put, self.build_uri(uri), encode(data)?))
    }

    pub fn build_simple_del_call<T: Serialize>(&self, uri: &str, data: Option<&T>) -> Result<HttpRequest, ApiError> {
        let path = self.build_uri(uri);
        match data {
            Some(data) => Ok(HttpRequest::json(HttpMethod::Delete, path, encode(data)?)),
            None => Ok(HttpRequest::bodyless(HttpMethod::Delete, path)),
        }
    }

    pub fn parse_simple_call(&self, reply: Reply) -> Result<Value, ApiError> {
        decode(reply)
    }

    // -----------------------------------------------------------------------
    // Referential calls.
    // -----------------------------------------------------------------------

    /// GET `uri`. `noloading` suppresses the `Submitted` action.
    pub fn build_get_referential(&self, uri: &str, noloading: bool) -> Prepared {
        let events = if noloading { Vec::new() } else { vec![Action::Submitted] };
        Prepared {
            request: HttpRequest::bodyless(HttpMethod::Get, self.build_uri(uri)),
            events,
        }
    }

    pub fn parse_get_referential(&self, schema: Option<&Schema>, reply: Reply) -> Outcome<Value, ApiError> {
        match decode_with(schema, reply) {
            Ok(data) => Outcome {
                events: vec![Action::FetchSuccess(data.clone())],
                notifications: Vec::new(),
                result: Ok(data),
            },
            Err(error) => Outcome {
                events: vec![Action::FetchError(error.clone())],
                notifications: Vec::new(),
                result: Err(error),
            },
        }
    }

    pub fn build_put_referential<T: Serialize>(&self, uri: &str, data: &T) -> Result<Prepared, ApiError> {
        Ok(Prepared {
            request: HttpRequest::json(HttpMethod::Put, self.build_uri(uri), encode(data)?),
            events: vec![Action::Submitted],
        })
    }

    pub fn parse_put_referential(&self, schema: Option<&Schema>, reply: Reply) -> Outcome<Value, ErrorShape> {
        match decode_with(schema, reply) {
            Ok(data) => Outcome {
                events: vec![Action::FetchSuccess(data.clone()), Action::UpdateSuccess(data.clone())],
                notifications: vec![Notification::Success(UPDATED_MESSAGE.to_string())],
                result: Ok(data),
            },
            Err(error) => write_failure(error, false),
        }
    }

    pub fn build_post_referential<T: Serialize>(&self, uri: &str, data: &T) -> Result<Prepared, ApiError> {
        Ok(Prepared {
            request: HttpRequest::json(HttpMethod::Post, self.build_uri(uri), encode(data)?),
            events: vec![Action::Submitted],
        })
    }

    pub fn parse_post_referential(&self, schema: Option<&Schema>, reply: Reply) -> Outcome<Value, ErrorShape> {
        match decode_with(schema, reply) {
            Ok(data) => Outcome {
                events: vec![Action::FetchSuccess(data.clone())],
                notifications: Vec::new(),
                result: Ok(data),
            },
            Err(error) => write_failure(error, true),
        }
    }

    pub fn build_del_referential(&self, uri: &str) -> Prepared {
        Prepared {
            request: HttpRequest::bodyless(HttpMethod::Delete, self.build_uri(uri)),
            events: vec![Action::Submitted],
        }
    }

    /// On success, emits `DeleteSuccess` carrying `{entity_type, id}`.
    pub fn parse_del_referential(&self, reply: Reply, entity_type: &str, id: &str) -> Outcome<(), ApiError> {
        match decode(reply) {
            Ok(_) => Outcome {
                events: vec![Action::DeleteSuccess(DeletedEntity {
                    entity_type: entity_type.to_string(),
                    id: id.to_string(),
                })],
                notifications: Vec::new(),
                result: Ok(()),
            },
            Err(error) => Outcome {
                events: vec![Action::FetchError(error.clone())],
                notifications: Vec::new(),
                result: Err(error),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Filter option search.
    // -----------------------------------------------------------------------

    /// Request for the option endpoint behind `filter_key`, if it has one.
    pub fn build_search_options(&self, filter_key: &str, search: &str) -> Option<(SearchTarget, HttpRequest)> {
        let target = SearchTarget::from_filter_key(filter_key)?;
        let request = self.build_simple_call(&target.search_uri(search));
        Some((target, request))
    }

    /// Decode the option list, running labels through `translate` for
    /// targets whose labels are translation keys.
    pub fn parse_search_options(
        &self,
        target: SearchTarget,
        reply: Reply,
        translate: impl Fn(&str) -> String,
    ) -> Result<Vec<SearchOption>, ApiError> {
        let data = decode(reply)?;
        let mut options: Vec<SearchOption> =
            serde_json::from_value(data).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        if target.translates_labels() {
            for option in &mut options {
                option.label = translate(&option.label);
            }
        }
        Ok(options)
    }

    /// POST the filter names to the schema endpoint of `entity_prefix`'s
    /// class. No names means no request.
    pub fn build_filterable_properties(
        &self,
        entity_prefix: &str,
        filter_names: &[String],
    ) -> Result<Option<HttpRequest>, ApiError> {
        if filter_names.is_empty() {
            return Ok(None);
        }
        let uri = format!("/api/schemas/{}", entity_class(entity_prefix));
        self.build_simple_post_call(&uri, &filter_names).map(Some)
    }

    /// Server-described properties, followed by the client-side ones the
    /// filter names call for.
    pub fn parse_filterable_properties(
        &self,
        entity_prefix: &str,
        filter_names: &[String],
        reply: Reply,
    ) -> Result<Vec<PropertySchema>, ApiError> {
        let data = decode(reply)?;
        let schemas: Vec<PropertySchema> =
            serde_json::from_value(data).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(augment_property_schemas(entity_prefix, filter_names, schemas))
    }
}

/// Shared failure path of PUT and POST. Conflicts always toast; internal
/// errors toast only on create.
fn write_failure(error: ApiError, toast_internal: bool) -> Outcome<Value, ErrorShape> {
    let mut notifications = Vec::new();
    match error.status() {
        Some(409) => notifications.push(Notification::Error(ALREADY_EXISTS_MESSAGE.to_string())),
        Some(500) if toast_internal => {
            notifications.push(Notification::Error(INTERNAL_ERROR_MESSAGE.to_string()))
        }
        _ => {}
    }
    let shape = ErrorShape::from(&error);
    Outcome {
        events: vec![Action::FetchError(error)],
        notifications,
        result: Err(shape),
    }
}

fn encode<T: Serialize>(data: &T) -> Result<String, ApiError> {
    serde_json::to_string(data).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn decode_with(schema: Option<&Schema>, reply: Reply) -> Result<Value, ApiError> {
    let data = decode(reply)?;
    match schema {
        Some(schema) => schema.normalize(data),
        None => Ok(data),
    }
}

/// Any 2xx is a success. Bodies that are not JSON come through as strings,
/// empty bodies as `null`.
fn decode(reply: Reply) -> Result<Value, ApiError> {
    let response = reply?;
    let body = body_value(response.body.trim());
    if response.is_success() {
        return Ok(body);
    }
    Err(ApiError::Http {
        status: response.status,
        body,
    })
}

fn body_value(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
