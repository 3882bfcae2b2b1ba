//! Rival battles.
//!
//! Battles are the one place the engine rolls dice. The roll comes from a
//! caller-supplied [`RandomSource`] so outcomes can be pinned in tests and
//! replayed from a seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::{Catalog, PrimaryStat, RivalDef};
use crate::outcome::Outcome;
use crate::rate::compute_rate;
use crate::state::GameState;

// ── Random source ───────────────────────────────────────────────

/// Uniform draws for combat.
pub trait RandomSource {
    /// Next draw in `[0, 1)`. A battle is won when the draw is below the
    /// win probability.
    fn roll(&mut self) -> f64;
}

/// Reproducible source backed by ChaCha8.
pub struct SeededRng(ChaCha8Rng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRng {
    fn roll(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always returns the same value. 0.0 wins every winnable fight, 1.0 loses
/// every fight.
#[derive(Clone, Copy, Debug)]
pub struct FixedRoll(pub f64);

impl RandomSource for FixedRoll {
    fn roll(&mut self) -> f64 {
        self.0
    }
}

// ── Power ───────────────────────────────────────────────────────

pub const AVIAN_DIPLOMACY_ID: &str = "avian_diplomacy";
const AVIAN_DIPLOMACY_PER_LEVEL: f64 = 0.01;
const POWER_PER_REPUTATION: f64 = 0.01;
const POWER_PER_UNLOCK: f64 = 0.01;
const POWER_PER_COLLEGE_LEVEL: f64 = 0.01;
const POWER_BONUS_STAT: f64 = 0.05;

pub const EXPERIENCE_PER_VICTORY: f64 = 10.0;
pub const EXPERIENCE_PER_LEVEL: f64 = 100.0;
/// Funding charged per current college level to level it up.
pub const SCHOLARSHIP_COST_PER_LEVEL: f64 = 100.0;

/// Battle power of one college, optionally against a specific rival for the
/// tactical advantage bonus.
pub fn college_power(
    state: &GameState,
    catalog: &Catalog,
    college_id: &str,
    rival: Option<&RivalDef>,
) -> f64 {
    let rate = compute_rate(state, catalog);
    let progress = state.college(college_id);
    let def = catalog.college(college_id);

    let mut college_multiplier = 1.0
        + progress.level as f64 * POWER_PER_COLLEGE_LEVEL
        + state.legacy_level(AVIAN_DIPLOMACY_ID) as f64 * AVIAN_DIPLOMACY_PER_LEVEL;
    if def.map_or(false, |c| c.primary_stat == PrimaryStat::PowerBonus) {
        college_multiplier += POWER_BONUS_STAT;
    }
    if let (Some(def), Some(rival)) = (def, rival) {
        if def.tactical_type.beats(rival.tactical_type) {
            college_multiplier *= catalog.constants.tactical_multiplier;
        }
    }

    rate * (1.0 + state.reputation * POWER_PER_REPUTATION)
        * (1.0 + state.unlock_count() as f64 * POWER_PER_UNLOCK)
        * college_multiplier
}

/// Combined power of the selected team.
pub fn team_power(state: &GameState, catalog: &Catalog, rival: Option<&RivalDef>) -> f64 {
    state
        .selected_college_ids
        .iter()
        .map(|id| college_power(state, catalog, id, rival))
        .sum()
}

/// Rival strength after victory scaling.
pub fn rival_power(state: &GameState, rival: &RivalDef) -> f64 {
    rival.base_power * state.rival_multiplier(&rival.id)
}

pub fn win_probability(user_power: f64, rival_power: f64) -> f64 {
    let total = user_power + rival_power;
    if total > 0.0 {
        user_power / total
    } else {
        0.0
    }
}

/// Win chance against `rival_id` in whole percent, as the battle panel shows it.
pub fn win_chance(state: &GameState, catalog: &Catalog, rival_id: &str) -> Option<u32> {
    let rival = catalog.rival(rival_id)?;
    let user = team_power(state, catalog, Some(rival)).floor();
    let p = win_probability(user, rival_power(state, rival));
    Some((p * 100.0).floor() as u32)
}

/// Rivals fought in a region: its regular rivals, then its boss.
pub fn rivals_in_region<'a>(catalog: &'a Catalog, region_id: &str) -> Vec<&'a RivalDef> {
    let region = match catalog.region(region_id) {
        Some(r) => r,
        None => return Vec::new(),
    };
    region
        .rival_ids
        .iter()
        .chain(std::iter::once(&region.boss_id))
        .filter_map(|id| catalog.rival(id))
        .collect()
}

// ── Resolution ──────────────────────────────────────────────────

/// Fight `rival_id` with the selected team.
///
/// Does nothing while the battle cooldown is running or for an unknown
/// rival. Otherwise the cooldown restarts whatever the result.
pub fn resolve_battle<R: RandomSource + ?Sized>(
    state: &GameState,
    catalog: &Catalog,
    rival_id: &str,
    rng: &mut R,
) -> Outcome {
    let rival = match catalog.rival(rival_id) {
        Some(r) => r,
        None => return Outcome::unchanged(state),
    };
    if !state.battle_state.is_ready() {
        return Outcome::unchanged(state);
    }

    let user_power = team_power(state, catalog, Some(rival)).floor();
    let chance = win_probability(user_power, rival_power(state, rival));
    let won = rng.roll() < chance;

    let mut next = state.clone();
    next.battle_state.cooldown = catalog.constants.battle_cooldown_ms;

    if !won {
        next.battle_state.last_result = Some(format!("Defeat! {} was too strong.", rival.name));
        log::debug!("lost to {} ({:.1}% chance)", rival.id, chance * 100.0);
        return Outcome::applied(next);
    }

    next.reputation += rival.reward_reputation;
    next.honks += rival.reward_honks;
    next.total_honks_earned += rival.reward_honks;

    for college_id in &next.selected_college_ids {
        let progress = next.colleges.entry(college_id.clone()).or_default();
        progress.experience += EXPERIENCE_PER_VICTORY;
        if progress.experience >= EXPERIENCE_PER_LEVEL {
            let scholarship = progress.level as f64 * SCHOLARSHIP_COST_PER_LEVEL;
            if next.funding >= scholarship {
                progress.experience -= EXPERIENCE_PER_LEVEL;
                progress.level = progress.level.saturating_add(1);
                next.funding -= scholarship;
            }
        }
    }

    let scaled = state.rival_multiplier(&rival.id) * catalog.constants.rival_scaling_per_victory;
    next.rival_power_multipliers
        .insert(rival.id.clone(), scaled.max(1.0));

    next.battle_state.last_result = Some(format!(
        "Victory! {} was defeated. +{} reputation",
        rival.name, rival.reward_reputation
    ));
    if rival.is_boss && !next.boss_defeated(&rival.id) {
        next.defeated_bosses.push(rival.id.clone());
        next.battle_state.last_result = Some(format!(
            "LEGENDARY VICTORY! {} has fallen!",
            rival.name
        ));
    }
    log::debug!("beat {} ({:.1}% chance)", rival.id, chance * 100.0);
    Outcome::applied(next)
}
