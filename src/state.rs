//! Goose University game state definitions.
//!
//! `GameState` is the only persisted entity. It serializes to the flat
//! camelCase record the browser build has always written, so older saves
//! keep loading (see `save.rs` for the migration rules).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::rate;
use crate::save::SAVE_VERSION;

/// Level/experience track of one college.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollegeProgress {
    pub level: u32,
    pub experience: f64,
}

impl Default for CollegeProgress {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0.0,
        }
    }
}

/// Battle readiness. `cooldown` is in milliseconds; 0 means ready.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleState {
    pub cooldown: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<String>,
}

impl BattleState {
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }
}

/// Full state of a Goose University run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    /// Save format version this record was written with (0 = pre-versioning).
    pub save_version: u32,

    /// Spendable honks.
    pub honks: f64,
    /// Lifetime honks for this run. Never decreases until accreditation.
    pub total_honks_earned: f64,
    /// Cached output of `rate::compute_rate`.
    pub honks_per_second: f64,
    pub reputation: f64,
    /// Prestige currency.
    pub golden_feathers: u64,
    pub students: f64,
    pub funding: f64,

    /// upgrade id → level
    pub upgrades: BTreeMap<String, u32>,
    /// unlock id → latched. Entries only ever go false → true.
    pub unlocks: BTreeMap<String, bool>,
    /// legacy upgrade id → level. Survives accreditation.
    pub legacy_upgrades: BTreeMap<String, u32>,
    pub colleges: BTreeMap<String, CollegeProgress>,
    /// rival id → difficulty multiplier (≥ 1.0, grows per victory).
    pub rival_power_multipliers: BTreeMap<String, f64>,

    /// Team for battles. Always exactly one entry.
    pub selected_college_ids: Vec<String>,
    pub current_region_id: String,
    /// Append-only.
    pub defeated_bosses: Vec<String>,
    pub battle_state: BattleState,
    /// Append-only.
    pub unlocked_costumes: Vec<String>,
    pub selected_costume: String,

    /// Purchases since the last efficiency audit. Drives friction and inflation.
    pub total_upgrades_purchased: u32,
    pub total_audits_performed: u32,
    pub time_played_seconds: f64,
    /// Wall-clock ms of the last save.
    pub last_save_time: f64,
}

impl GameState {
    /// A brand-new run built from the catalog's starting ids.
    pub fn new(catalog: &Catalog, now_ms: f64) -> Self {
        let mut state = Self {
            save_version: SAVE_VERSION,
            colleges: catalog
                .colleges
                .iter()
                .map(|c| (c.id.clone(), CollegeProgress::default()))
                .collect(),
            selected_college_ids: vec![catalog.start.college_id.clone()],
            current_region_id: catalog.start.region_id.clone(),
            unlocked_costumes: vec![catalog.start.costume_id.clone()],
            selected_costume: catalog.start.costume_id.clone(),
            last_save_time: now_ms,
            ..Self::default()
        };
        state.honks_per_second = rate::compute_rate(&state, catalog);
        state
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrades.get(id).copied().unwrap_or(0)
    }

    pub fn legacy_level(&self, id: &str) -> u32 {
        self.legacy_upgrades.get(id).copied().unwrap_or(0)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocks.get(id).copied().unwrap_or(false)
    }

    pub fn unlock_count(&self) -> usize {
        self.unlocks.values().filter(|&&v| v).count()
    }

    /// Progress of a college; colleges never seen before start at level 1.
    pub fn college(&self, id: &str) -> CollegeProgress {
        self.colleges.get(id).cloned().unwrap_or_default()
    }

    pub fn rival_multiplier(&self, id: &str) -> f64 {
        self.rival_power_multipliers
            .get(id)
            .copied()
            .unwrap_or(1.0)
            .max(1.0)
    }

    pub fn owns_costume(&self, id: &str) -> bool {
        self.unlocked_costumes.iter().any(|c| c == id)
    }

    pub fn boss_defeated(&self, id: &str) -> bool {
        self.defeated_bosses.iter().any(|b| b == id)
    }
}
