//! Cumulative star series
//!
//! A series maps each star event to the number of stars the repository had
//! gathered before it, which is what a star-history chart plots.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::StarEvent;

/// One point of a cumulative series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// When the star was given
    pub starred_at: DateTime<Utc>,
    /// Zero-based position of the event in the full ordered history
    pub stars: u64,
}

/// Cumulative star series of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarSeries {
    repository: String,
    points: Vec<SeriesPoint>,
}

impl StarSeries {
    /// Build a series from events ordered by `starred_at`
    ///
    /// The count of each point is its index in `events`, so trimming with
    /// `since` hides early points without resetting the count. Only events
    /// strictly after `since` are kept.
    pub fn from_events(
        repository: impl Into<String>,
        events: &[StarEvent],
        since: Option<DateTime<Utc>>,
    ) -> Self {
        let points = events
            .iter()
            .enumerate()
            .filter(|(_, event)| since.map_or(true, |cutoff| event.starred_at > cutoff))
            .map(|(index, event)| SeriesPoint {
                starred_at: event.starred_at,
                stars: index as u64,
            })
            .collect();

        Self {
            repository: repository.into(),
            points,
        }
    }

    /// Repository the series belongs to
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Series points, oldest first
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
