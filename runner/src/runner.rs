//! Async shell around `ReferentialClient`.
//!
//! # Design
//! Each call builds its request with the core, dispatches the pre-call
//! actions, awaits the transport, then applies the parsed `Outcome` to the
//! owned `Store` and `Notifier`. Calls are independent: nothing is
//! de-duplicated or cancelled, and whichever reply lands last wins in the
//! store.

use referential_core::{
    Action, ApiError, ErrorShape, Notifier, PropertySchema, ReferentialClient, Schema, SearchOption, Store,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RunnerConfig;
use crate::transport::{ReqwestTransport, Transport};

pub struct Runner<T, S, N> {
    client: ReferentialClient,
    transport: T,
    store: S,
    notifier: N,
}

impl<S: Store, N: Notifier> Runner<ReqwestTransport, S, N> {
    pub fn from_config(config: RunnerConfig, store: S, notifier: N) -> Self {
        let transport = ReqwestTransport::new(&config.origin);
        Runner::new(ReferentialClient::new(config.base_path), transport, store, notifier)
    }
}

impl<T: Transport, S: Store, N: Notifier> Runner<T, S, N> {
    pub fn new(client: ReferentialClient, transport: T, store: S, notifier: N) -> Self {
        Self {
            client,
            transport,
            store,
            notifier,
        }
    }

    pub fn client(&self) -> &ReferentialClient {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_parts(self) -> (S, N) {
        (self.store, self.notifier)
    }

    // Passthrough calls leave the store alone.

    pub async fn simple_call(&self, uri: &str) -> Result<Value, ApiError> {
        let request = self.client.build_simple_call(uri);
        self.client.parse_simple_call(self.transport.execute(request).await)
    }

    pub async fn simple_post_call<D: Serialize>(&self, uri: &str, data: &D) -> Result<Value, ApiError> {
        let request = self.client.build_simple_post_call(uri, data)?;
        self.client.parse_simple_call(self.transport.execute(request).await)
    }

    pub async fn simple_put_call<D: Serialize>(&self, uri: &str, data: &D) -> Result<Value, ApiError> {
        let request = self.client.build_simple_put_call(uri, data)?;
        self.client.parse_simple_call(self.transport.execute(request).await)
    }

    pub async fn simple_del_call<D: Serialize>(&self, uri: &str, data: Option<&D>) -> Result<Value, ApiError> {
        let request = self.client.build_simple_del_call(uri, data)?;
        self.client.parse_simple_call(self.transport.execute(request).await)
    }

    pub async fn get_referential(
        &mut self,
        schema: Option<&Schema>,
        uri: &str,
        noloading: bool,
    ) -> Result<Value, ApiError> {
        let request = self.client.build_get_referential(uri, noloading).start(&mut self.store);
        debug!(path = %request.path, noloading, "fetching referential");
        let reply = self.transport.execute(request).await;
        let result = self
            .client
            .parse_get_referential(schema, reply)
            .apply(&mut self.store, &mut self.notifier);
        if let Err(error) = &result {
            warn!(uri, status = ?error.status(), %error, "referential fetch failed");
        }
        result
    }

    /// Failures resolve to `Err(ErrorShape)` for inline form errors.
    pub async fn put_referential<D: Serialize>(
        &mut self,
        schema: Option<&Schema>,
        uri: &str,
        data: &D,
    ) -> Result<Value, ErrorShape> {
        let prepared = match self.client.build_put_referential(uri, data) {
            Ok(prepared) => prepared,
            Err(error) => return Err(self.reject_unsent(uri, error)),
        };
        let request = prepared.start(&mut self.store);
        debug!(path = %request.path, "updating referential");
        let reply = self.transport.execute(request).await;
        let result = self
            .client
            .parse_put_referential(schema, reply)
            .apply(&mut self.store, &mut self.notifier);
        if let Err(shape) = &result {
            warn!(uri, form_error = ?shape.form_error, "referential update failed");
        }
        result
    }

    pub async fn post_referential<D: Serialize>(
        &mut self,
        schema: Option<&Schema>,
        uri: &str,
        data: &D,
    ) -> Result<Value, ErrorShape> {
        let prepared = match self.client.build_post_referential(uri, data) {
            Ok(prepared) => prepared,
            Err(error) => return Err(self.reject_unsent(uri, error)),
        };
        let request = prepared.start(&mut self.store);
        debug!(path = %request.path, "creating referential");
        let reply = self.transport.execute(request).await;
        let result = self
            .client
            .parse_post_referential(schema, reply)
            .apply(&mut self.store, &mut self.notifier);
        if let Err(shape) = &result {
            warn!(uri, form_error = ?shape.form_error, "referential creation failed");
        }
        result
    }

    pub async fn del_referential(&mut self, uri: &str, entity_type: &str, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_del_referential(uri).start(&mut self.store);
        debug!(path = %request.path, entity_type, id, "deleting referential");
        let reply = self.transport.execute(request).await;
        let result = self
            .client
            .parse_del_referential(reply, entity_type, id)
            .apply(&mut self.store, &mut self.notifier);
        if let Err(error) = &result {
            warn!(uri, status = ?error.status(), %error, "referential deletion failed");
        }
        result
    }

    /// Options for a filter widget. Keys without an option endpoint yield
    /// an empty list without any request.
    pub async fn search_options(
        &self,
        filter_key: &str,
        search: &str,
        translate: impl Fn(&str) -> String,
    ) -> Result<Vec<SearchOption>, ApiError> {
        let Some((target, request)) = self.client.build_search_options(filter_key, search) else {
            debug!(filter_key, "filter key has no option search");
            return Ok(Vec::new());
        };
        let reply = self.transport.execute(request).await;
        self.client.parse_search_options(target, reply, translate)
    }

    /// Filterable properties of `entity_prefix`'s class for the given
    /// filter names. No names yields an empty list without any request.
    pub async fn filterable_properties(
        &self,
        entity_prefix: &str,
        filter_names: &[String],
    ) -> Result<Vec<PropertySchema>, ApiError> {
        let Some(request) = self.client.build_filterable_properties(entity_prefix, filter_names)? else {
            return Ok(Vec::new());
        };
        let reply = self.transport.execute(request).await;
        self.client.parse_filterable_properties(entity_prefix, filter_names, reply)
    }

    /// A write whose body could not be encoded still goes through the
    /// loading cycle so the store does not wait on a request never sent.
    fn reject_unsent(&mut self, uri: &str, error: ApiError) -> ErrorShape {
        warn!(uri, %error, "referential write not sent");
        let shape = ErrorShape::from(&error);
        self.store.dispatch(Action::Submitted);
        self.store.dispatch(Action::FetchError(error));
        shape
    }
}
