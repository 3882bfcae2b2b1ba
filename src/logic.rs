//! Goose University progression. Pure functions, fully testable.
//!
//! Every entry point takes the current snapshot by reference and returns a
//! fresh one; the input is never modified.

use crate::catalog::{Catalog, RegionDef};
use crate::outcome::Outcome;
use crate::rate::compute_rate;
use crate::state::GameState;

/// Legacy id the cooldown reduction looks up. No legacy upgrade in the
/// shipped catalog carries this id, so the reduction stays inert unless a
/// catalog adds one.
pub const MOBILITY_LEGACY_ID: &str = "migratory_mobility";
const MOBILITY_REDUCTION_PER_LEVEL: f64 = 0.05;
/// Cooldowns never run more than 10× faster than real time.
const MIN_COOLDOWN_FACTOR: f64 = 0.1;

pub const RECRUITMENT_DRIVE_ID: &str = "recruitment_drive";
const RECRUITMENT_BONUS_PER_LEVEL: f64 = 0.25;

/// How many milliseconds of cooldown elapse per real millisecond.
pub fn cooldown_speedup(state: &GameState) -> f64 {
    let level = state.legacy_level(MOBILITY_LEGACY_ID) as f64;
    let factor = (1.0 - level * MOBILITY_REDUCTION_PER_LEVEL).max(MIN_COOLDOWN_FACTOR);
    1.0 / factor
}

/// Advance the game by `elapsed_ms` of real time.
///
/// Offline catch-up goes through here too, as one large delta.
pub fn tick(state: &GameState, catalog: &Catalog, elapsed_ms: f64) -> GameState {
    let elapsed_ms = if elapsed_ms.is_finite() {
        elapsed_ms.max(0.0)
    } else {
        0.0
    };
    let seconds = elapsed_ms / 1000.0;
    let constants = &catalog.constants;
    let mut next = state.clone();

    let rate = compute_rate(state, catalog);
    let production = rate * seconds;
    next.honks += production;
    next.total_honks_earned += production;

    // Enrollment follows the rate at the start of the tick; funding follows
    // the enrollment after it.
    let recruitment =
        1.0 + state.legacy_level(RECRUITMENT_DRIVE_ID) as f64 * RECRUITMENT_BONUS_PER_LEVEL;
    next.students += rate * constants.students_per_honk_sec * seconds * recruitment;
    next.funding += next.students * constants.funding_per_student_sec * seconds;

    next.time_played_seconds += seconds;

    let cooled = next.battle_state.cooldown - elapsed_ms * cooldown_speedup(state);
    next.battle_state.cooldown = cooled.max(0.0);

    next.honks_per_second = rate;
    if latch_unlocks(&mut next, catalog) {
        next.honks_per_second = compute_rate(&next, catalog);
    }
    next
}

/// Latch every unlock whose threshold lifetime honks have reached.
/// Returns true if anything flipped.
fn latch_unlocks(state: &mut GameState, catalog: &Catalog) -> bool {
    let mut flipped = false;
    for unlock in &catalog.unlocks {
        if state.is_unlocked(&unlock.id) || state.total_honks_earned < unlock.threshold {
            continue;
        }
        state.unlocks.insert(unlock.id.clone(), true);
        log::debug!("unlocked {} at {} honks", unlock.id, state.total_honks_earned);

        if let Some(costume) = &unlock.costume_id {
            if !state.owns_costume(costume) {
                state.unlocked_costumes.push(costume.clone());
                state.selected_costume = costume.clone();
            }
        }
        flipped = true;
    }
    flipped
}

/// Manual honk. Not throttled.
pub fn click_goose(state: &GameState, catalog: &Catalog) -> GameState {
    let power = catalog.constants.click_honks;
    let mut next = state.clone();
    next.honks += power;
    next.total_honks_earned += power;
    next
}

/// Make `college_id` the whole battle team. The id is not checked.
pub fn select_college(state: &GameState, college_id: &str) -> GameState {
    let mut next = state.clone();
    next.selected_college_ids = vec![college_id.to_string()];
    next
}

pub fn region_unlocked(state: &GameState, region: &RegionDef) -> bool {
    state.reputation >= region.unlock_reputation
}

/// Travel to a region whose reputation gate has been met.
pub fn select_region(state: &GameState, catalog: &Catalog, region_id: &str) -> Outcome {
    let region = match catalog.region(region_id) {
        Some(r) => r,
        None => return Outcome::unchanged(state),
    };
    if !region_unlocked(state, region) {
        return Outcome::unchanged(state);
    }

    let mut next = state.clone();
    next.current_region_id = region.id.clone();
    next.honks_per_second = compute_rate(&next, catalog);
    Outcome::applied(next)
}

/// Equip a costume the player already owns.
pub fn select_costume(state: &GameState, costume_id: &str) -> Outcome {
    if !state.owns_costume(costume_id) {
        return Outcome::unchanged(state);
    }
    let mut next = state.clone();
    next.selected_costume = costume_id.to_string();
    Outcome::applied(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (Catalog, GameState) {
        let catalog = Catalog::builtin();
        let state = GameState::new(&catalog, 0.0);
        (catalog, state)
    }

    #[test]
    fn one_second_at_base_rate() {
        let (catalog, state) = fresh();
        let next = tick(&state, &catalog, 1000.0);
        assert!((next.honks - state.honks - 1.0).abs() < 1e-12);
        assert!((next.time_played_seconds - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tick_does_not_modify_input() {
        let (catalog, state) = fresh();
        let before = state.clone();
        let _ = tick(&state, &catalog, 5000.0);
        assert_eq!(state, before);
    }

    #[test]
    fn tick_zero_is_identity_on_fresh_state() {
        let (catalog, state) = fresh();
        let next = tick(&state, &catalog, 0.0);
        assert_eq!(next, state);
    }

    #[test]
    fn negative_and_nan_elapsed_clamp_to_zero() {
        let (catalog, state) = fresh();
        assert_eq!(tick(&state, &catalog, -500.0), state);
        assert_eq!(tick(&state, &catalog, f64::NAN), state);
    }

    #[test]
    fn time_played_accumulates() {
        let (catalog, state) = fresh();
        let s1 = tick(&state, &catalog, 1000.0);
        let s2 = tick(&s1, &catalog, 1500.0);
        assert!((s2.time_played_seconds - 2.5).abs() < 1e-12);
    }

    #[test]
    fn students_and_funding_accrue() {
        let (catalog, mut state) = fresh();
        state.upgrades.insert("better_goose".into(), 99); // 100 hps
        let next = tick(&state, &catalog, 10_000.0);
        // 100 hps * 0.01 * 10 s
        assert!((next.students - 10.0).abs() < 1e-9);
        // 10 students * 0.001 * 10 s
        assert!((next.funding - 0.1).abs() < 1e-9);
    }

    #[test]
    fn recruitment_drive_speeds_enrollment() {
        let (catalog, mut state) = fresh();
        state.legacy_upgrades.insert(RECRUITMENT_DRIVE_ID.into(), 2);
        let next = tick(&state, &catalog, 1000.0);
        // 1 hps * 0.01 * 1 s * 1.5
        assert!((next.students - 0.015).abs() < 1e-12);
    }

    #[test]
    fn cooldown_decrements_and_floors() {
        let (catalog, mut state) = fresh();
        state.battle_state.cooldown = 1500.0;
        let next = tick(&state, &catalog, 1000.0);
        assert!((next.battle_state.cooldown - 500.0).abs() < 1e-9);
        let done = tick(&next, &catalog, 1000.0);
        assert_eq!(done.battle_state.cooldown, 0.0);
        assert!(done.battle_state.is_ready());
    }

    #[test]
    fn mobility_legacy_speeds_cooldown_up_to_cap() {
        let mut state = GameState::default();
        state.legacy_upgrades.insert(MOBILITY_LEGACY_ID.into(), 10);
        assert!((cooldown_speedup(&state) - 2.0).abs() < 1e-9);
        state.legacy_upgrades.insert(MOBILITY_LEGACY_ID.into(), 100);
        assert!((cooldown_speedup(&state) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn shipped_legacy_upgrades_do_not_touch_cooldown() {
        let catalog = Catalog::builtin();
        let mut state = GameState::default();
        for u in &catalog.legacy_upgrades {
            state.legacy_upgrades.insert(u.id.clone(), 5);
        }
        assert!((cooldown_speedup(&state) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_threshold_latches_unlock() {
        let (catalog, mut state) = fresh();
        state.total_honks_earned = 99_999.5;
        let next = tick(&state, &catalog, 1000.0);
        assert!(next.is_unlocked("division_of_feathered_sciences"));
        assert!(next.is_unlocked("college_of_honkery"));
        // Rate cache reflects both new multipliers.
        assert!((next.honks_per_second - 1.01 * 1.01).abs() < 1e-9);
    }

    #[test]
    fn unlock_grants_and_equips_costume() {
        let (catalog, mut state) = fresh();
        state.total_honks_earned = 500_000.0;
        let next = tick(&state, &catalog, 0.0);
        assert!(next.owns_costume("scientist"));
        assert!(next.owns_costume("athlete"));
        assert_eq!(next.unlocked_costumes[0], "default");
        // Catalog order: athlete comes last and stays equipped.
        assert_eq!(next.selected_costume, "athlete");
    }

    #[test]
    fn already_owned_costume_is_not_duplicated_or_equipped() {
        let (catalog, mut state) = fresh();
        state.unlocked_costumes.push("scientist".into());
        state.total_honks_earned = 100_000.0;
        let next = tick(&state, &catalog, 0.0);
        assert_eq!(
            next.unlocked_costumes.iter().filter(|c| *c == "scientist").count(),
            1
        );
        assert_eq!(next.selected_costume, "default");
    }

    #[test]
    fn click_adds_fixed_honks() {
        let (catalog, state) = fresh();
        let next = click_goose(&state, &catalog);
        assert!((next.honks - 1.0).abs() < 1e-12);
        assert!((next.total_honks_earned - 1.0).abs() < 1e-12);
    }

    #[test]
    fn select_college_replaces_team() {
        let (_, state) = fresh();
        let next = select_college(&state, "athletic_department");
        assert_eq!(next.selected_college_ids, vec!["athletic_department"]);
    }

    #[test]
    fn select_region_requires_reputation() {
        let (catalog, state) = fresh();
        let out = select_region(&state, &catalog, "academic_city");
        assert!(!out.applied);
        assert_eq!(out.state, state);
    }

    #[test]
    fn select_region_unknown_is_noop() {
        let (catalog, state) = fresh();
        let out = select_region(&state, &catalog, "atlantis");
        assert!(!out.applied);
        assert_eq!(out.state, state);
    }

    #[test]
    fn select_region_applies_multiplier_immediately() {
        let (catalog, mut state) = fresh();
        state.reputation = 50.0;
        let out = select_region(&state, &catalog, "academic_city");
        assert!(out.applied);
        assert_eq!(out.state.current_region_id, "academic_city");
        assert!((out.state.honks_per_second - 2.0).abs() < 1e-9);
    }

    #[test]
    fn select_costume_requires_ownership() {
        let (_, state) = fresh();
        assert!(!select_costume(&state, "athlete").applied);
        let mut owned = state.clone();
        owned.unlocked_costumes.push("athlete".into());
        let out = select_costume(&owned, "athlete");
        assert!(out.applied);
        assert_eq!(out.state.selected_costume, "athlete");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_total_honks_never_decrease(
            start in 0.0f64..1e9,
            steps in proptest::collection::vec(0.0f64..3_600_000.0, 1..20),
        ) {
            let catalog = Catalog::builtin();
            let mut state = GameState::new(&catalog, 0.0);
            state.total_honks_earned = start;
            for elapsed in steps {
                let next = tick(&state, &catalog, elapsed);
                prop_assert!(next.total_honks_earned >= state.total_honks_earned);
                prop_assert!(next.battle_state.cooldown >= 0.0);
                state = next;
            }
        }

        #[test]
        fn prop_unlocks_stay_latched(
            steps in proptest::collection::vec(0.0f64..600_000.0, 1..30),
        ) {
            let catalog = Catalog::builtin();
            let mut state = GameState::new(&catalog, 0.0);
            state.upgrades.insert("better_goose".into(), 200);
            for elapsed in steps {
                let next = tick(&state, &catalog, elapsed);
                for (id, latched) in &state.unlocks {
                    if *latched {
                        prop_assert!(next.is_unlocked(id));
                    }
                }
                state = next;
            }
        }

        #[test]
        fn prop_split_ticks_match_single_tick(a in 0.0f64..100_000.0, b in 0.0f64..100_000.0) {
            // No unlock can be crossed from zero within 200 s at the base rate.
            let catalog = Catalog::builtin();
            let state = GameState::new(&catalog, 0.0);
            let split = tick(&tick(&state, &catalog, a), &catalog, b);
            let whole = tick(&state, &catalog, a + b);
            prop_assert!((split.honks - whole.honks).abs() < 1e-6);
            prop_assert!((split.time_played_seconds - whole.time_played_seconds).abs() < 1e-6);
        }

        #[test]
        fn prop_selection_always_single(ids in proptest::collection::vec("[a-z_]{1,12}", 1..10)) {
            let catalog = Catalog::builtin();
            let mut state = GameState::new(&catalog, 0.0);
            for id in &ids {
                state = select_college(&state, id);
                prop_assert_eq!(state.selected_college_ids.len(), 1);
            }
        }
    }
}
