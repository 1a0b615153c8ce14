use crate::synced_entity;
use packwise_types::{PersonId, SyncMeta, TripId};
use serde::{Deserialize, Serialize};

/// A traveller on a trip.
///
/// `age` and `gender` are optional because some trips are planned without
/// demographic detail; conditions on a missing field simply do not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(flatten)]
    pub meta: SyncMeta<PersonId>,
    pub trip_id: TripId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Free-form per-person preferences owned by the view layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Map<String, serde_json::Value>>,
}

synced_entity!(Person, PersonId, "person", purgeable);

impl Person {
    /// New person with only a name; demographic fields start empty.
    pub fn new(trip_id: TripId, name: impl Into<String>) -> Self {
        Self {
            meta: SyncMeta::new(PersonId::new()),
            trip_id,
            name: name.into(),
            age: None,
            gender: None,
            settings: None,
        }
    }

    /// Sets the age in years.
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Shorthand for `meta.id`.
    pub fn id(&self) -> PersonId {
        self.meta.id
    }

    /// Live people of a trip, ordered by id.
    pub fn roster(trip_id: TripId, people: &[Person]) -> Vec<&Person> {
        let mut roster: Vec<&Person> = people
            .iter()
            .filter(|p| p.meta.is_live() && p.trip_id == trip_id)
            .collect();
        roster.sort_by_key(|p| p.id());
        roster
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Lowercase name, as compared by gender conditions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}
