//! Assignment results and their JSON summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AssignResult;

/// Where one spot landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// External identifier of the spot.
    pub spot_id: String,
    /// Position of the spot in the input sequence.
    pub rank: usize,
    /// Index of the owning source mesh.
    pub owner: usize,
    /// Name of the owning source mesh.
    pub owner_name: String,
    /// Whether the spot lies inside its owner.
    pub inside: bool,
    /// Distance to the closest owner vertex.
    pub distance: f64,
    /// Classification hit a zero-length direction and fell back to inside.
    pub degenerate: bool,
}

impl Assignment {
    /// Output name for the spot, `<owner>-<rank>`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_assign::Assignment;
    ///
    /// let a = Assignment {
    ///     spot_id: "spot.004".into(),
    ///     rank: 4,
    ///     owner: 0,
    ///     owner_name: "nucleus".into(),
    ///     inside: true,
    ///     distance: 0.5,
    ///     degenerate: false,
    /// };
    /// assert_eq!(a.tag(), "nucleus-4");
    /// ```
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}-{}", self.owner_name, self.rank)
    }
}

/// Inside/outside tally for one owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InOutCount {
    /// Spots classified inside.
    #[serde(rename = "in")]
    pub inside: usize,
    /// Spots classified outside.
    #[serde(rename = "out")]
    pub outside: usize,
}

impl InOutCount {
    /// Total spots.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inside + self.outside
    }

    pub(crate) fn record(&mut self, inside: bool) {
        if inside {
            self.inside += 1;
        } else {
            self.outside += 1;
        }
    }
}

/// Result of assigning a set of spots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentReport {
    /// One entry per assigned spot, in input order.
    pub assignments: Vec<Assignment>,
    /// Tallies keyed by owner name. Owners without spots are absent.
    pub counts: BTreeMap<String, InOutCount>,
    /// Ids of spots left unassigned by a distance limit.
    pub unassigned: Vec<String>,
}

impl AssignmentReport {
    /// Number of assigned spots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Check if no spot was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Spots classified inside, over all owners.
    #[must_use]
    pub fn inside_count(&self) -> usize {
        self.counts.values().map(|c| c.inside).sum()
    }

    /// Spots classified outside, over all owners.
    #[must_use]
    pub fn outside_count(&self) -> usize {
        self.counts.values().map(|c| c.outside).sum()
    }

    /// Assignments that fell back to the degenerate convention.
    #[must_use]
    pub fn degenerate_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.degenerate).count()
    }

    /// Tally for one owner.
    #[must_use]
    pub fn count_for(&self, owner_name: &str) -> InOutCount {
        self.counts.get(owner_name).copied().unwrap_or_default()
    }

    /// Assignments owned by `owner_name`.
    pub fn for_owner<'a>(&'a self, owner_name: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.owner_name == owner_name)
    }

    /// Per-owner tallies as pretty-printed JSON, `{"name": {"in": n, "out": m}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn summary_json(&self) -> AssignResult<String> {
        Ok(serde_json::to_string_pretty(&self.counts)?)
    }

    pub(crate) fn push(&mut self, assignment: Assignment) {
        self.counts
            .entry(assignment.owner_name.clone())
            .or_default()
            .record(assignment.inside);
        self.assignments.push(assignment);
    }
}
