use std::fmt;

use jumpgrid_core::Point;

/// Why a path query could not produce a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The query was rejected before any search state was touched.
    #[error("invalid path query {start} -> {goal}: {reason}")]
    InvalidQuery {
        start: Point,
        goal: Point,
        reason: QueryFault,
    },
    /// The open list ran dry without reaching the goal.
    #[error("no path from {start} to {goal}")]
    Unreachable { start: Point, goal: Point },
}

/// Reason attached to [`SearchError::InvalidQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryFault {
    StartOutOfBounds,
    GoalOutOfBounds,
    SameCell,
    StartBlocked,
    GoalBlocked,
}

impl fmt::Display for QueryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            QueryFault::StartOutOfBounds => "start lies outside the map",
            QueryFault::GoalOutOfBounds => "goal lies outside the map",
            QueryFault::SameCell => "start and goal are the same cell",
            QueryFault::StartBlocked => "start cell is occupied",
            QueryFault::GoalBlocked => "goal cell is occupied",
        };
        f.write_str(msg)
    }
}

impl SearchError {
    /// The fault behind an invalid query, if that is what this is.
    pub fn fault(&self) -> Option<QueryFault> {
        match self {
            SearchError::InvalidQuery { reason, .. } => Some(*reason),
            SearchError::Unreachable { .. } => None,
        }
    }
}
