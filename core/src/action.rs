//! Store actions and user-facing notifications.
//!
//! # Design
//! Operations never dispatch anything themselves. They return the actions
//! and notifications to emit as values; a host applies them to its `Store`
//! and `Notifier` in order (see [`Outcome::apply`]).
//!
//! Actions serialize to the `{"type": ..., "payload": ...}` envelope the
//! reducers consume.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpRequest;

/// Discriminant of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "DATA_FETCH_SUBMITTED")]
    Submitted,
    #[serde(rename = "DATA_FETCH_SUCCESS")]
    FetchSuccess,
    #[serde(rename = "DATA_FETCH_ERROR")]
    FetchError,
    #[serde(rename = "DATA_UPDATE_SUCCESS")]
    UpdateSuccess,
    #[serde(rename = "DATA_DELETE_SUCCESS")]
    DeleteSuccess,
}

/// Marker carried by `DATA_DELETE_SUCCESS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

/// A lifecycle event for the external store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "DATA_FETCH_SUBMITTED")]
    Submitted,
    #[serde(rename = "DATA_FETCH_SUCCESS")]
    FetchSuccess(Value),
    #[serde(rename = "DATA_FETCH_ERROR")]
    FetchError(ApiError),
    #[serde(rename = "DATA_UPDATE_SUCCESS")]
    UpdateSuccess(Value),
    #[serde(rename = "DATA_DELETE_SUCCESS")]
    DeleteSuccess(DeletedEntity),
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Submitted => ActionType::Submitted,
            Action::FetchSuccess(_) => ActionType::FetchSuccess,
            Action::FetchError(_) => ActionType::FetchError,
            Action::UpdateSuccess(_) => ActionType::UpdateSuccess,
            Action::DeleteSuccess(_) => ActionType::DeleteSuccess,
        }
    }
}

pub const UPDATED_MESSAGE: &str = "The element has been updated";
pub const ALREADY_EXISTS_MESSAGE: &str = "The element already exists";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// A toast for the messaging sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Receives dispatched actions.
pub trait Store {
    fn dispatch(&mut self, action: Action);
}

/// Receives user-facing notifications.
pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);

    fn notify(&mut self, notification: &Notification) {
        match notification {
            Notification::Success(message) => self.notify_success(message),
            Notification::Error(message) => self.notify_error(message),
        }
    }
}

impl Store for Vec<Action> {
    fn dispatch(&mut self, action: Action) {
        self.push(action);
    }
}

impl Notifier for Vec<Notification> {
    fn notify_success(&mut self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn notify_error(&mut self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}

/// A request ready to execute and the actions to emit before executing it.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub request: HttpRequest,
    pub events: Vec<Action>,
}

impl Prepared {
    /// Dispatch the pre-call actions and hand back the request.
    pub fn start(self, store: &mut impl Store) -> HttpRequest {
        for action in self.events {
            store.dispatch(action);
        }
        self.request
    }
}

/// Result of parsing a reply, with the side effects it calls for.
#[derive(Debug, Clone)]
pub struct Outcome<T, E> {
    pub events: Vec<Action>,
    pub notifications: Vec<Notification>,
    pub result: Result<T, E>,
}

impl<T, E> Outcome<T, E> {
    /// Dispatch events, then deliver notifications, then yield the result.
    pub fn apply(self, store: &mut impl Store, notifier: &mut impl Notifier) -> Result<T, E> {
        for action in self.events {
            store.dispatch(action);
        }
        for notification in &self.notifications {
            notifier.notify(notification);
        }
        self.result
    }

    pub fn event_types(&self) -> Vec<ActionType> {
        self.events.iter().map(Action::action_type).collect()
    }
}
