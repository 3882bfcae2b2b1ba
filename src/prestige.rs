//! Accreditation: trade a run's lifetime honks for golden feathers.

use crate::catalog::Catalog;
use crate::outcome::Outcome;
use crate::rate::compute_rate;
use crate::state::GameState;

/// Feathers an accreditation right now would pay out.
pub fn pending_feathers(state: &GameState, catalog: &Catalog) -> u64 {
    let threshold = catalog.constants.ascension_threshold;
    if threshold <= 0.0 || !state.total_honks_earned.is_finite() {
        return 0;
    }
    (state.total_honks_earned / threshold).floor().max(0.0) as u64
}

pub fn can_accredit(state: &GameState, catalog: &Catalog) -> bool {
    state.total_honks_earned >= catalog.constants.ascension_threshold
}

/// Reset the run, keeping feathers, legacy upgrades, costumes, play time and
/// the purchase/audit counters.
pub fn accredit_university(state: &GameState, catalog: &Catalog) -> Outcome {
    if !can_accredit(state, catalog) {
        return Outcome::unchanged(state);
    }
    let gained = pending_feathers(state, catalog);

    let mut next = GameState::new(catalog, state.last_save_time);
    next.golden_feathers = state.golden_feathers.saturating_add(gained);
    next.legacy_upgrades = state.legacy_upgrades.clone();
    next.unlocked_costumes = state.unlocked_costumes.clone();
    next.selected_costume = state.selected_costume.clone();
    next.time_played_seconds = state.time_played_seconds;
    next.total_upgrades_purchased = state.total_upgrades_purchased;
    next.total_audits_performed = state.total_audits_performed;
    next.honks_per_second = compute_rate(&next, catalog);

    log::info!(
        "accredited: +{} golden feathers ({} total)",
        gained,
        next.golden_feathers
    );
    Outcome::applied(next)
}
