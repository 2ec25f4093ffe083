use crate::constants::{DEFAULT_ATTEMPT_TIMEOUT_SECS, DEFAULT_DEADLINE_SECS};
use crate::domain::{QualityTier, TaskKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Ordered fallback chains and time budgets shared by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Overall budget for one request, across all fallback attempts.
    pub deadline: Duration,
    /// Per-attempt bound for profiles without their own `timeout_secs`.
    pub default_timeout: Duration,
    pub chains: BTreeMap<TaskKind, Vec<String>>,
    pub image_tiers: BTreeMap<QualityTier, Vec<String>>,
    /// Per task, caller-facing hint names mapped onto provider ids.
    pub hints: BTreeMap<TaskKind, BTreeMap<String, String>>,
}

impl RoutingConfig {
    pub fn chain_for(&self, task: TaskKind) -> Option<&[String]> {
        self.chains.get(&task).map(Vec::as_slice)
    }

    pub fn tier_chain(&self, tier: QualityTier) -> Option<&[String]> {
        self.image_tiers.get(&tier).map(Vec::as_slice)
    }

    /// Provider id a hint names for `task`. Hints without an alias name the
    /// provider directly.
    pub fn resolve_hint<'a>(&'a self, task: TaskKind, hint: &'a str) -> &'a str {
        self.hints
            .get(&task)
            .and_then(|aliases| aliases.get(hint))
            .map(String::as_str)
            .unwrap_or(hint)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            default_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            chains: BTreeMap::new(),
            image_tiers: BTreeMap::new(),
            hints: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawRouting {
    #[serde(default)]
    pub(super) deadline_secs: Option<u64>,
    #[serde(default)]
    pub(super) default_timeout_secs: Option<u64>,
    #[serde(default)]
    pub(super) chains: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub(super) image_tiers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub(super) hints: BTreeMap<String, BTreeMap<String, String>>,
}
