//! The shrinking set of locations still open for placement.
//!
//! An [`AvailableLocations`] value is created once per run and moved through
//! the phases in order. Each phase takes it by value and hands it back, so at
//! any point exactly one phase owns the right to claim a location.

use std::collections::VecDeque;

use crate::models::Location;

/// Locations that have not been claimed yet, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableLocations {
    ids: VecDeque<String>,
}

impl AvailableLocations {
    /// Collects the available locations of a snapshot, keeping input order.
    ///
    /// # Example
    ///
    /// ```
    /// use placement_engine::allocation::AvailableLocations;
    /// use placement_engine::models::Location;
    ///
    /// let locations = vec![
    ///     Location::available("loc_1"),
    ///     Location::unavailable("loc_2"),
    ///     Location::available("loc_3"),
    /// ];
    /// let available = AvailableLocations::from_locations(&locations);
    /// assert_eq!(available.len(), 2);
    /// assert!(!available.contains("loc_2"));
    /// ```
    pub fn from_locations(locations: &[Location]) -> Self {
        Self {
            ids: locations
                .iter()
                .filter(|l| l.is_available)
                .map(|l| l.id.clone())
                .collect(),
        }
    }

    /// Number of unclaimed locations.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when every location has been claimed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if the location is still unclaimed.
    pub fn contains(&self, location_id: &str) -> bool {
        self.ids.iter().any(|id| id == location_id)
    }

    /// Claims a specific location, returning its id if it was still open.
    pub fn claim(&mut self, location_id: &str) -> Option<String> {
        let index = self.ids.iter().position(|id| id == location_id)?;
        self.ids.remove(index)
    }

    /// Claims the first unclaimed location in input order.
    pub fn claim_next(&mut self) -> Option<String> {
        self.ids.pop_front()
    }

    /// Iterates over unclaimed location ids in input order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Consumes the set, returning the unclaimed ids in input order.
    pub fn into_ids(self) -> Vec<String> {
        self.ids.into()
    }
}
