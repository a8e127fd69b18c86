//! Location and preference models.

use serde::{Deserialize, Serialize};

/// A location that can be assigned to one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier for the location.
    pub id: String,
    /// Display name, carried through for collaborators.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the location takes part in this allocation run.
    pub is_available: bool,
}

impl Location {
    /// Creates an available location without a display name.
    pub fn available(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            is_available: true,
        }
    }

    /// Creates a location that is excluded from allocation.
    pub fn unavailable(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            is_available: false,
        }
    }
}

/// One entry of a candidate's ranked preference list.
///
/// Rank 1 is the most preferred location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    /// The candidate expressing the preference.
    pub candidate_id: String,
    /// The preferred location.
    pub location_id: String,
    /// Position in the candidate's list, smaller is more preferred.
    pub rank: u32,
}

impl PreferenceEntry {
    /// Creates a preference entry.
    pub fn new(candidate_id: impl Into<String>, location_id: impl Into<String>, rank: u32) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            location_id: location_id.into(),
            rank,
        }
    }
}
