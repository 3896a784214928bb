//! Goal catalog: the 17 query definitions that drive goal location.
//!
//! The catalog ships inside the binary and is parsed once on first use. Each
//! entry holds three lowercase term sets; a sentence discusses a goal when it
//! contains every `required` term, at least one `optional` term, and no
//! `stoppers` term.

use crate::error::{InsightError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Number of goals in the catalog
pub const GOAL_COUNT: u8 = 17;

const QUERIES_JSON: &str = include_str!("queries.json");

/// Match terms for one goal
#[derive(Debug, Clone, Deserialize)]
pub struct GoalQuery {
    #[serde(skip)]
    pub goal_id: u8,
    pub required: Vec<String>,
    pub optional: Vec<String>,
    pub stoppers: Vec<String>,
}

/// All goal queries, ordered by goal id
pub struct Catalog {
    entries: Vec<GoalQuery>,
}

static CATALOG: Lazy<Catalog> =
    Lazy::new(|| Catalog::from_embedded().expect("embedded goal catalog must be valid"));

impl Catalog {
    /// The process-wide catalog
    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    fn from_embedded() -> anyhow::Result<Self> {
        let mut raw: HashMap<String, GoalQuery> = serde_json::from_str(QUERIES_JSON)?;
        let mut entries = Vec::with_capacity(GOAL_COUNT as usize);
        for goal_id in 1..=GOAL_COUNT {
            let key = format!("sdg_{goal_id}");
            let mut query = raw
                .remove(&key)
                .ok_or_else(|| anyhow::anyhow!("goal catalog is missing entry {key}"))?;
            query.goal_id = goal_id;
            warn_on_dead_terms(&query);
            entries.push(query);
        }
        if !raw.is_empty() {
            let mut extra: Vec<&str> = raw.keys().map(String::as_str).collect();
            extra.sort_unstable();
            anyhow::bail!("goal catalog has unexpected entries: {}", extra.join(", "));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[GoalQuery] {
        &self.entries
    }

    pub fn get(&self, goal_id: u8) -> Result<&GoalQuery> {
        if goal_id == 0 || goal_id > GOAL_COUNT {
            return Err(InsightError::Catalog { goal_id });
        }
        Ok(&self.entries[(goal_id - 1) as usize])
    }

    /// Output label for a goal
    pub fn label(goal_id: u8) -> String {
        format!("Goal {goal_id}")
    }
}

fn warn_on_dead_terms(query: &GoalQuery) {
    let mut seen: HashSet<&str> = HashSet::new();
    for term in query
        .required
        .iter()
        .chain(&query.optional)
        .chain(&query.stoppers)
    {
        if term.chars().any(|c| c.is_uppercase()) {
            tracing::warn!(
                "goal {} term '{}' is not lowercase and can never match",
                query.goal_id,
                term
            );
        }
        if !seen.insert(term.as_str()) {
            tracing::warn!(
                "goal {} term '{}' appears in more than one role",
                query.goal_id,
                term
            );
        }
    }
    if query.required.is_empty() || query.optional.is_empty() {
        tracing::warn!(
            "goal {} has an empty required or optional set and can never match",
            query.goal_id
        );
    }
}
