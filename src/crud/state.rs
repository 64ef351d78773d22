//! CRUD state for one model's list view.
//!
//! Every list load takes a sequence ticket. When a load completes after a
//! newer load or a write was issued its result is dropped, so neither a
//! slow, superseded search nor a load racing a create or delete overwrites
//! fresher rows. Failures are stored as a message and
//! reported to the caller as `None`/`false`.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;

use super::pagination::PaginationState;
use crate::client::{lock, CrudService, QueryParams};
use crate::errors::AppError;
use crate::models::{record_id, ModelDescriptor, Record};

/// Observable state of a list view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudSnapshot {
    pub items: Vec<Record>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: PaginationState,
}

pub struct CrudState {
    model: Arc<ModelDescriptor>,
    service: Arc<dyn CrudService>,
    state: Mutex<CrudSnapshot>,
    in_flight: AtomicUsize,
    latest_load: AtomicU64,
    updates: watch::Sender<CrudSnapshot>,
}

impl std::fmt::Debug for CrudState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudState")
            .field("model", &self.model.model_name())
            .field("endpoint", &self.service.endpoint())
            .field("state", &*lock(&self.state))
            .finish()
    }
}

impl CrudState {
    pub fn new(model: Arc<ModelDescriptor>, service: Arc<dyn CrudService>, page_size: u32) -> Self {
        let initial = CrudSnapshot {
            pagination: PaginationState::new(page_size),
            ..CrudSnapshot::default()
        };
        let (updates, _) = watch::channel(initial.clone());

        Self {
            model,
            service,
            state: Mutex::new(initial),
            in_flight: AtomicUsize::new(0),
            latest_load: AtomicU64::new(0),
            updates,
        }
    }

    pub fn model(&self) -> &Arc<ModelDescriptor> {
        &self.model
    }

    pub fn snapshot(&self) -> CrudSnapshot {
        lock(&self.state).clone()
    }

    pub fn items(&self) -> Vec<Record> {
        lock(&self.state).items.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn pagination(&self) -> PaginationState {
        lock(&self.state).pagination
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<CrudSnapshot> {
        self.updates.subscribe()
    }

    fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let mut state = lock(&self.state);
        state.loading = true;
        state.error = None;
        self.updates.send_replace(state.clone());
    }

    fn finish(&self, apply: impl FnOnce(&mut CrudSnapshot)) {
        let mut state = lock(&self.state);
        apply(&mut state);
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        state.loading = remaining > 0;
        self.updates.send_replace(state.clone());
    }

    fn next_ticket(&self) -> u64 {
        self.latest_load.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidate list loads still in flight; a write changes the rows
    /// they would replace.
    fn supersede_loads(&self) {
        self.next_ticket();
    }

    fn is_current(&self, ticket: u64) -> bool {
        let current = self.latest_load.load(Ordering::SeqCst) == ticket;
        if !current {
            tracing::debug!(
                "Discarding superseded load #{} for {}",
                ticket,
                self.model.model_name()
            );
        }
        current
    }

    /// Load a page. Paging defaults to the current pagination state; any
    /// field set in `params` wins.
    pub async fn load_data(&self, params: QueryParams) {
        let ticket = self.next_ticket();
        let query = {
            let state = lock(&self.state);
            QueryParams {
                page: params.page.or(Some(state.pagination.current_page)),
                page_size: params.page_size.or(Some(state.pagination.page_size)),
                ..params
            }
        };

        self.begin();
        let result = self.service.list_paginated(&query).await;
        self.finish(|state| {
            if !self.is_current(ticket) {
                return;
            }
            match result {
                Ok(response) => {
                    state.pagination.apply(&response);
                    state.items = response.data;
                }
                Err(e) => state.error = Some(failure(&e, "Error al cargar datos")),
            }
        });
    }

    /// Load every active row, without paging.
    pub async fn load_active(&self) {
        let ticket = self.next_ticket();
        self.begin();
        let result = self.service.list_active(&QueryParams::default()).await;
        self.finish(|state| {
            if !self.is_current(ticket) {
                return;
            }
            match result {
                Ok(items) => state.items = items,
                Err(e) => state.error = Some(failure(&e, "Error al cargar datos activos")),
            }
        });
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Record> {
        self.begin();
        let result = self.service.get_by_id(id).await;
        let mut found = None;
        self.finish(|state| match result {
            Ok(record) => found = Some(record),
            Err(e) => state.error = Some(failure(&e, "Error al obtener el registro")),
        });
        found
    }

    /// Create a row from form data. The payload is stripped of system and
    /// client-only fields first.
    pub async fn create(&self, item: &Record) -> Option<Record> {
        let prepared = self.model.prepare_for_backend(item);
        self.supersede_loads();
        self.begin();
        let result = self.service.create(&prepared).await;
        let mut created = None;
        self.finish(|state| match result {
            Ok(record) => {
                state.items.push(record.clone());
                state.pagination.total += 1;
                created = Some(record);
            }
            Err(e) => state.error = Some(failure(&e, "Error al crear el registro")),
        });
        created
    }

    pub async fn update(&self, id: &str, item: &Record) -> Option<Record> {
        let prepared = self.model.prepare_for_backend(item);
        self.supersede_loads();
        self.begin();
        let result = self.service.update(id, &prepared).await;
        let mut updated = None;
        self.finish(|state| match result {
            Ok(record) => {
                if let Some(slot) = state
                    .items
                    .iter_mut()
                    .find(|row| record_id(row).as_deref() == Some(id))
                {
                    *slot = record.clone();
                }
                updated = Some(record);
            }
            Err(e) => state.error = Some(failure(&e, "Error al actualizar el registro")),
        });
        updated
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.supersede_loads();
        self.begin();
        let result = self.service.delete(id).await;
        let mut removed = false;
        self.finish(|state| match result {
            Ok(()) => {
                state.items.retain(|row| record_id(row).as_deref() != Some(id));
                state.pagination.total = state.pagination.total.saturating_sub(1);
                removed = true;
            }
            Err(e) => state.error = Some(failure(&e, "Error al eliminar el registro")),
        });
        removed
    }

    pub async fn batch_remove(&self, ids: &[String]) -> bool {
        self.supersede_loads();
        self.begin();
        let result = self.service.batch_delete(ids).await;
        let mut removed = false;
        self.finish(|state| match result {
            Ok(()) => {
                state
                    .items
                    .retain(|row| record_id(row).map_or(true, |id| !ids.contains(&id)));
                state.pagination.total =
                    state.pagination.total.saturating_sub(ids.len() as u64);
                removed = true;
            }
            Err(e) => state.error = Some(failure(&e, "Error al eliminar registros")),
        });
        removed
    }

    pub async fn search(&self, term: &str, params: QueryParams) {
        self.load_data(params.search(term)).await
    }

    pub async fn change_page(&self, page: u32) {
        lock(&self.state).pagination.current_page = page.max(1);
        self.load_data(QueryParams::default()).await
    }

    pub async fn change_page_size(&self, page_size: u32) {
        {
            let mut state = lock(&self.state);
            state.pagination.page_size = page_size.max(1);
            state.pagination.current_page = 1;
        }
        self.load_data(QueryParams::default()).await
    }

    pub async fn refresh(&self) {
        self.load_data(QueryParams::default()).await
    }
}

fn failure(error: &AppError, fallback: &str) -> String {
    tracing::error!("{}: {}", fallback, error);
    let message = error.message();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
