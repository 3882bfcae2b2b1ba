//! Honk rate calculation and price formulas.
//!
//! Everything the display layer shows as a price or a rate must come from
//! here so the numbers always agree with what the engine charges.

use crate::catalog::{Catalog, Constants, CostScaling, LegacyUpgradeDef, UpgradeDef, UpgradeEffect};
use crate::state::GameState;

/// Legacy upgrade boosting the honk rate.
pub const GOLDEN_RESONANCE_ID: &str = "golden_resonance";
const GOLDEN_RESONANCE_PER_LEVEL: f64 = 0.1;

/// Each legacy level adds this much to a legacy upgrade's feather price.
const LEGACY_COST_STEP: u64 = 2;

/// Price of the next level of an upgrade currently at `level`.
pub fn upgrade_cost(upgrade: &UpgradeDef, level: u32) -> f64 {
    match upgrade.cost_scaling {
        CostScaling::Linear => upgrade.base_cost + level as f64 * upgrade.cost_factor,
        CostScaling::Exponential => {
            (upgrade.base_cost * upgrade.cost_factor.powf(level as f64)).floor()
        }
    }
}

/// Feather price of the next level of a legacy upgrade.
pub fn legacy_upgrade_cost(upgrade: &LegacyUpgradeDef, level: u32) -> u64 {
    upgrade
        .base_cost
        .saturating_add(level as u64 * LEGACY_COST_STEP)
}

/// Administrative friction: every block of 10 purchases shaves a fixed
/// fraction off the rate, never going below the configured floor.
pub fn friction_multiplier(total_upgrades_purchased: u32, constants: &Constants) -> f64 {
    let blocks = (total_upgrades_purchased / 10) as f64;
    (1.0 - blocks * constants.friction_per_10_upgrades).max(constants.friction_floor)
}

/// Inflation decay: `inflation_base ^ purchases`. Strictly decreasing in the
/// purchase count for a base below 1, and never zero.
pub fn inflation_multiplier(total_upgrades_purchased: u32, constants: &Constants) -> f64 {
    constants
        .inflation_base
        .powf(total_upgrades_purchased as f64)
        .max(f64::MIN_POSITIVE)
}

/// Multiplier of the active region; 1.0 when the id is not in the catalog.
pub fn region_multiplier(state: &GameState, catalog: &Catalog) -> f64 {
    catalog
        .region(&state.current_region_id)
        .map(|r| r.multiplier)
        .filter(|m| m.is_finite() && *m >= 0.0)
        .unwrap_or(1.0)
}

/// Current honks per second, folding in every modifier source.
pub fn compute_rate(state: &GameState, catalog: &Catalog) -> f64 {
    let constants = &catalog.constants;
    let mut base_rate = constants.initial_honks_per_second;
    let mut multiplier = 1.0;

    for upgrade in &catalog.upgrades {
        let level = state.upgrade_level(&upgrade.id);
        if level == 0 || !upgrade.effect_value.is_finite() {
            continue;
        }
        match upgrade.effect_type {
            UpgradeEffect::Add => base_rate += upgrade.effect_value * level as f64,
            UpgradeEffect::Multiply => {
                if upgrade.effect_value > 0.0 {
                    multiplier *= upgrade.effect_value.powf(level as f64);
                }
            }
        }
    }

    for unlock in &catalog.unlocks {
        if state.is_unlocked(&unlock.id) && unlock.multiplier.is_finite() && unlock.multiplier > 0.0 {
            multiplier *= unlock.multiplier;
        }
    }

    multiplier *= 1.0 + state.legacy_level(GOLDEN_RESONANCE_ID) as f64 * GOLDEN_RESONANCE_PER_LEVEL;
    multiplier *= region_multiplier(state, catalog);
    multiplier *= friction_multiplier(state.total_upgrades_purchased, constants);
    multiplier *= inflation_multiplier(state.total_upgrades_purchased, constants);

    let rate = base_rate * multiplier;
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}
