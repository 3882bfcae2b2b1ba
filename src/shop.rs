//! Purchases: upgrades, legacy upgrades and efficiency audits.

use crate::catalog::Catalog;
use crate::outcome::Outcome;
use crate::rate::{compute_rate, legacy_upgrade_cost, upgrade_cost};
use crate::state::GameState;

/// Purchases since the last audit before the audit desk opens.
pub const AUDIT_UNLOCK_PURCHASES: u32 = 10;

/// Price of the next efficiency audit. Both currencies are charged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuditCost {
    pub honks: f64,
    pub funding: f64,
}

/// Audit prices double with every audit performed.
pub fn audit_cost(state: &GameState, catalog: &Catalog) -> AuditCost {
    let scale = 2f64.powf(state.total_audits_performed as f64);
    AuditCost {
        honks: catalog.constants.audit_base_cost_honks * scale,
        funding: catalog.constants.audit_base_cost_funding * scale,
    }
}

/// Whether the display layer should offer an audit at all.
pub fn audit_available(state: &GameState) -> bool {
    state.total_upgrades_purchased >= AUDIT_UNLOCK_PURCHASES
}

/// Price of the next level of `upgrade_id`, if the upgrade exists.
pub fn next_upgrade_cost(state: &GameState, catalog: &Catalog, upgrade_id: &str) -> Option<f64> {
    catalog
        .upgrade(upgrade_id)
        .map(|u| upgrade_cost(u, state.upgrade_level(upgrade_id)))
}

/// Buy one level of an upgrade with honks.
pub fn buy_upgrade(state: &GameState, catalog: &Catalog, upgrade_id: &str) -> Outcome {
    let upgrade = match catalog.upgrade(upgrade_id) {
        Some(u) => u,
        None => return Outcome::unchanged(state),
    };
    if let Some(req) = &upgrade.req_unlock_id {
        if !state.is_unlocked(req) {
            return Outcome::unchanged(state);
        }
    }

    let level = state.upgrade_level(upgrade_id);
    let Some(next_level) = level.checked_add(1) else {
        return Outcome::unchanged(state);
    };
    let cost = upgrade_cost(upgrade, level);
    if state.honks < cost {
        return Outcome::unchanged(state);
    }

    let mut next = state.clone();
    next.honks -= cost;
    next.upgrades.insert(upgrade.id.clone(), next_level);
    next.total_upgrades_purchased = next.total_upgrades_purchased.saturating_add(1);
    next.honks_per_second = compute_rate(&next, catalog);
    log::debug!("bought {} level {} for {}", upgrade.id, next_level, cost);
    Outcome::applied(next)
}

/// Buy one level of a legacy upgrade with golden feathers.
pub fn buy_legacy_upgrade(state: &GameState, catalog: &Catalog, upgrade_id: &str) -> Outcome {
    let upgrade = match catalog.legacy_upgrade(upgrade_id) {
        Some(u) => u,
        None => return Outcome::unchanged(state),
    };

    let level = state.legacy_level(upgrade_id);
    let Some(next_level) = level.checked_add(1) else {
        return Outcome::unchanged(state);
    };
    let cost = legacy_upgrade_cost(upgrade, level);
    if state.golden_feathers < cost {
        return Outcome::unchanged(state);
    }

    let mut next = state.clone();
    next.golden_feathers -= cost;
    next.legacy_upgrades.insert(upgrade.id.clone(), next_level);
    next.honks_per_second = compute_rate(&next, catalog);
    log::debug!("bought legacy {} level {} for {} feathers", upgrade.id, next_level, cost);
    Outcome::applied(next)
}

/// Pay honks and funding to clear accumulated friction.
///
/// Resetting the purchase counter also lifts inflation decay, which keys off
/// the same counter.
pub fn buy_efficiency_audit(state: &GameState, catalog: &Catalog) -> Outcome {
    let cost = audit_cost(state, catalog);
    if state.honks < cost.honks || state.funding < cost.funding {
        return Outcome::unchanged(state);
    }

    let mut next = state.clone();
    next.honks -= cost.honks;
    next.funding -= cost.funding;
    next.total_upgrades_purchased = 0;
    next.total_audits_performed = next.total_audits_performed.saturating_add(1);
    next.honks_per_second = compute_rate(&next, catalog);
    log::debug!("efficiency audit #{} performed", next.total_audits_performed);
    Outcome::applied(next)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_unknown_upgrade_is_identity(id in "[a-z]{1,16}", honks in 0.0f64..1e12) {
            let catalog = Catalog::builtin();
            prop_assume!(catalog.upgrade(&id).is_none());
            let mut state = GameState::new(&catalog, 0.0);
            state.honks = honks;
            let out = buy_upgrade(&state, &catalog, &id);
            prop_assert!(!out.applied);
            prop_assert_eq!(out.state, state);
        }

        #[test]
        fn prop_purchase_never_overdraws(honks in 0.0f64..10_000.0, buys in 1usize..40) {
            let catalog = Catalog::builtin();
            let mut state = GameState::new(&catalog, 0.0);
            state.honks = honks;
            for _ in 0..buys {
                state = buy_upgrade(&state, &catalog, "better_goose").state;
                prop_assert!(state.honks >= 0.0);
            }
        }
    }
}
