use crate::synced_entity;
use chrono::{DateTime, Utc};
use packwise_types::{HybridTimestamp, SyncMeta, TripEventId, TripId};
use serde::{Deserialize, Serialize};

/// Root aggregate: every day, person, trip-rule link and override belongs to
/// exactly one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(flatten)]
    pub meta: SyncMeta<TripId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TripEvent>,
}

synced_entity!(Trip, TripId, "trip");

impl Trip {
    /// New trip with no events.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            meta: SyncMeta::new(TripId::new()),
            title: title.into(),
            description: None,
            events: Vec::new(),
        }
    }

    /// Shorthand for `meta.id`.
    pub fn id(&self) -> TripId {
        self.meta.id
    }

    /// Trip events ordered by date, then id.
    pub fn timeline(&self) -> Vec<&TripEvent> {
        let mut events: Vec<&TripEvent> = self.events.iter().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        events
    }

    /// Earliest `leave_home` marker.
    pub fn departure(&self) -> Option<&TripEvent> {
        self.timeline()
            .into_iter()
            .find(|e| e.kind == TripEventKind::LeaveHome)
    }

    /// Latest `arrive_home` marker.
    pub fn return_home(&self) -> Option<&TripEvent> {
        self.timeline()
            .into_iter()
            .rev()
            .find(|e| e.kind == TripEventKind::ArriveHome)
    }
}

/// A timeline marker. Not evaluated by rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEvent {
    pub id: TripEventId,
    #[serde(rename = "type")]
    pub kind: TripEventKind,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TripEvent {
    /// New event with a fresh id.
    pub fn new(kind: TripEventKind, date: DateTime<Utc>) -> Self {
        Self {
            id: TripEventId::new(),
            kind,
            date,
            location: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripEventKind {
    LeaveHome,
    ArriveHome,
    LeaveDestination,
    ArriveDestination,
}

/// Read-only aggregate derived from a materialized packing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    pub trip_id: TripId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: HybridTimestamp,
    pub updated_at: HybridTimestamp,
    pub total_items: u64,
    pub packed_items: u64,
    pub total_people: usize,
}
