//! Dashboard selection handling.
//!
//! Each selection takes a ticket before its fetch starts. When the fetch
//! returns, a newer ticket means the user has moved on and the result is
//! dropped instead of rendered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::ForecastClient;
use crate::derive::{build_view, CurrentPolicy, DashboardView};
use crate::error::FetchError;
use crate::types::{Coordinate, TemperatureUnit};

/// Proof of a selection's place in line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionTicket(u64);

/// Monotonic generation counter
#[derive(Debug, Default)]
pub struct SelectionGuard {
    latest: AtomicU64,
}

impl SelectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection, superseding every earlier ticket.
    pub fn issue(&self) -> SelectionTicket {
        SelectionTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub coordinate: Coordinate,
    pub unit: TemperatureUnit,
}

#[derive(Debug)]
pub enum SelectionOutcome {
    Ready(Box<DashboardView>),
    Failed(FetchError),
    /// A newer selection was made while this one was in flight
    Superseded,
}

pub struct Dashboard {
    client: Arc<ForecastClient>,
    guard: SelectionGuard,
    policy: CurrentPolicy,
}

impl Dashboard {
    pub fn new(client: Arc<ForecastClient>) -> Self {
        Self {
            client,
            guard: SelectionGuard::new(),
            policy: CurrentPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CurrentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn client(&self) -> &Arc<ForecastClient> {
        &self.client
    }

    pub async fn select(&self, selection: Selection) -> SelectionOutcome {
        self.select_at(selection, Utc::now()).await
    }

    /// Fetch and derive the view for `selection` as of `now`.
    pub async fn select_at(&self, selection: Selection, now: DateTime<Utc>) -> SelectionOutcome {
        let ticket = self.guard.issue();
        let result = self.client.fetch(&selection.coordinate).await;

        if !self.guard.is_current(ticket) {
            tracing::info!(
                "Dropping forecast for {}: a newer selection is pending",
                selection.coordinate.label()
            );
            return SelectionOutcome::Superseded;
        }

        match result {
            Ok(forecast) => SelectionOutcome::Ready(Box::new(build_view(
                &forecast,
                now,
                selection.unit,
                self.policy,
            ))),
            Err(e) => {
                tracing::error!("Failed to fetch weather: {}", e);
                SelectionOutcome::Failed(e)
            }
        }
    }
}
