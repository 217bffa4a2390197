//! Worlds: ordered level sequences with unlock rules
//!
//! Evaluated purely against run summaries the host hands in; nothing here is
//! stored between sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::state::RunSummary;

/// What must be achieved before a level opens up
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequirement {
    /// Levels that must each have a completed run
    pub previous_levels: Vec<String>,
    /// Minimum score for those runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u64>,
    /// Maximum time (seconds) for those runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
}

impl UnlockRequirement {
    fn satisfied_by(&self, run: &RunSummary) -> bool {
        run.completed
            && self.min_score.is_none_or(|min| run.score >= min)
            && self.max_time.is_none_or(|max| run.time_elapsed <= max)
    }
}

/// An ordered set of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: String,
    pub name: String,
    /// Level ids in play order
    pub levels: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unlock_requirements: BTreeMap<String, UnlockRequirement>,
}

impl World {
    /// Whether `level_id` can be played given the runs so far.
    ///
    /// Levels outside this world are never unlocked. Levels without a
    /// requirement are always unlocked. Otherwise every listed previous level
    /// needs at least one run that satisfies the requirement.
    pub fn is_unlocked(&self, level_id: &str, runs: &[RunSummary]) -> bool {
        if !self.levels.iter().any(|l| l == level_id) {
            return false;
        }
        let Some(requirement) = self.unlock_requirements.get(level_id) else {
            return true;
        };
        requirement.previous_levels.iter().all(|previous| {
            runs.iter()
                .any(|run| &run.level_id == previous && requirement.satisfied_by(run))
        })
    }

    /// The level that follows `level_id`, if any
    pub fn next_level(&self, level_id: &str) -> Option<&str> {
        let index = self.levels.iter().position(|l| l == level_id)?;
        self.levels.get(index + 1).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut unlock_requirements = BTreeMap::new();
        unlock_requirements.insert(
            "1-2".to_string(),
            UnlockRequirement {
                previous_levels: vec!["1-1".to_string()],
                min_score: Some(1000),
                max_time: Some(120.0),
            },
        );
        World {
            id: "w1".to_string(),
            name: "World 1".to_string(),
            levels: vec!["1-1".to_string(), "1-2".to_string()],
            unlock_requirements,
        }
    }

    fn run(level_id: &str, score: u64, time: f64, completed: bool) -> RunSummary {
        RunSummary {
            level_id: level_id.to_string(),
            score,
            coins_collected: 0,
            enemies_defeated: 0,
            completed,
            time_elapsed: time,
        }
    }

    #[test]
    fn test_first_level_always_open() {
        assert!(world().is_unlocked("1-1", &[]));
        assert!(!world().is_unlocked("9-9", &[]));
    }

    #[test]
    fn test_requirement_checks_score_time_and_completion() {
        let w = world();
        assert!(!w.is_unlocked("1-2", &[]));
        assert!(!w.is_unlocked("1-2", &[run("1-1", 500, 60.0, true)]));
        assert!(!w.is_unlocked("1-2", &[run("1-1", 1500, 200.0, true)]));
        assert!(!w.is_unlocked("1-2", &[run("1-1", 1500, 60.0, false)]));
        assert!(w.is_unlocked(
            "1-2",
            &[run("1-1", 500, 60.0, true), run("1-1", 1500, 90.0, true)]
        ));
    }

    #[test]
    fn test_next_level() {
        let w = world();
        assert_eq!(w.next_level("1-1"), Some("1-2"));
        assert_eq!(w.next_level("1-2"), None);
    }
}
