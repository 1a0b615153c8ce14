use crate::synced_entity;
use chrono::NaiveDate;
use packwise_types::{DayId, SyncMeta, TripId};
use serde::{Deserialize, Serialize};

/// One planned day of a trip.
///
/// A day's index (the value override scopes refer to) is its position in the
/// trip's ordered day sequence, not a field on the day itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    #[serde(flatten)]
    pub meta: SyncMeta<DayId>,
    pub trip_id: TripId,
    /// Calendar date; unique within a trip.
    pub date: NaiveDate,
    pub location: String,
    /// Free text such as "warm, rain showers".
    pub expected_climate: String,
    /// Planned activities or ad-hoc items for the day ("beach", "hiking").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// True when the travellers are in transit for (part of) the day.
    #[serde(default)]
    pub travel: bool,
}

synced_entity!(Day, DayId, "day");

impl Day {
    pub fn new(
        trip_id: TripId,
        date: NaiveDate,
        location: impl Into<String>,
        expected_climate: impl Into<String>,
    ) -> Self {
        Self {
            meta: SyncMeta::new(DayId::new()),
            trip_id,
            date,
            location: location.into(),
            expected_climate: expected_climate.into(),
            items: Vec::new(),
            travel: false,
        }
    }

    /// Marks the day as spent (partly) in transit.
    pub fn travel_day(mut self) -> Self {
        self.travel = true;
        self
    }

    /// Replaces the day's planned items.
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Shorthand for `meta.id`.
    pub fn id(&self) -> DayId {
        self.meta.id
    }

    /// Orders days into index order: by date, then id.
    pub fn ordered(days: &[Day]) -> Vec<&Day> {
        let mut ordered: Vec<&Day> = days.iter().collect();
        ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.id().cmp(&b.id())));
        ordered
    }

    /// A trip's days paired with their index. Tombstones keep their slot so
    /// later indices do not shift when a day is deleted.
    pub fn indexed(trip_id: TripId, days: &[Day]) -> Vec<(usize, &Day)> {
        Day::ordered(days)
            .into_iter()
            .filter(|d| d.trip_id == trip_id)
            .enumerate()
            .collect()
    }
}
