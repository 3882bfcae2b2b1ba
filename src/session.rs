//! Game driver: owns the live state and feeds it time and player actions.
//!
//! The host calls [`Session::advance`] with wall-clock timestamps from its
//! frame loop and [`Session::apply`] for each player intent. The session runs
//! progression on a fixed 100 ms cadence and autosaves on the catalog's
//! interval.

use crate::battle::{resolve_battle, RandomSource};
use crate::catalog::Catalog;
use crate::logic::{click_goose, select_college, select_costume, select_region, tick};
use crate::outcome::Outcome;
use crate::prestige::accredit_university;
use crate::save::{BlobStore, SaveSlot, StoreError};
use crate::shop::{buy_efficiency_audit, buy_legacy_upgrade, buy_upgrade};
use crate::state::GameState;
use crate::time::TickClock;

/// Every player intent the engine understands.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Click,
    BuyUpgrade(String),
    BuyLegacyUpgrade(String),
    EfficiencyAudit,
    SelectCollege(String),
    SelectRegion(String),
    SelectCostume(String),
    Battle(String),
    Accredit,
}

pub struct Session<S, R> {
    catalog: Catalog,
    state: GameState,
    slot: SaveSlot<S>,
    rng: R,
    clock: TickClock,
    /// Game time since the last autosave.
    since_save_ms: f64,
}

impl<S: BlobStore, R: RandomSource> Session<S, R> {
    /// Load (or start) a run and catch up on time spent away.
    pub fn open(catalog: Catalog, store: S, rng: R, now_ms: f64) -> Self {
        let mut slot = SaveSlot::new(store);
        let state = slot.load(&catalog, now_ms);
        let mut clock = TickClock::default();
        clock.update(now_ms);
        log::info!(
            "session opened: {:.0} honks, {} golden feathers",
            state.honks,
            state.golden_feathers
        );
        Self {
            catalog,
            state,
            slot,
            rng,
            clock,
            since_save_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        self.slot.store()
    }

    /// Run every tick due by `now_ms`. Returns the number of ticks run.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let ticks = self.clock.update(now_ms);
        let step = self.clock.ms_per_tick();
        for _ in 0..ticks {
            self.state = tick(&self.state, &self.catalog, step);
        }

        self.since_save_ms += ticks as f64 * step;
        if self.since_save_ms >= self.catalog.constants.autosave_interval_ms {
            self.since_save_ms = 0.0;
            if let Err(e) = self.save_now(now_ms) {
                log::warn!("autosave failed: {e}");
            }
        }
        ticks
    }

    /// Apply one player action. Returns whether it changed anything.
    pub fn apply(&mut self, action: Action) -> bool {
        let state = &self.state;
        let catalog = &self.catalog;
        let outcome = match &action {
            Action::Click => Outcome::applied(click_goose(state, catalog)),
            Action::BuyUpgrade(id) => buy_upgrade(state, catalog, id),
            Action::BuyLegacyUpgrade(id) => buy_legacy_upgrade(state, catalog, id),
            Action::EfficiencyAudit => buy_efficiency_audit(state, catalog),
            Action::SelectCollege(id) => Outcome::applied(select_college(state, id)),
            Action::SelectRegion(id) => select_region(state, catalog, id),
            Action::SelectCostume(id) => select_costume(state, id),
            Action::Battle(rival_id) => resolve_battle(state, catalog, rival_id, &mut self.rng),
            Action::Accredit => accredit_university(state, catalog),
        };
        if !outcome.applied {
            log::debug!("{:?} had no effect", action);
        }
        let applied = outcome.applied;
        self.state = outcome.into_state();
        applied
    }

    /// Persist the current state stamped with `now_ms`.
    pub fn save_now(&mut self, now_ms: f64) -> Result<(), StoreError> {
        self.slot.save(&self.state, now_ms)
    }

    /// Wipe the save and start over.
    pub fn reset(&mut self, now_ms: f64) {
        self.slot.clear();
        self.state = GameState::new(&self.catalog, now_ms);
        self.clock.restart();
        self.clock.update(now_ms);
        self.since_save_ms = 0.0;
        log::info!("save reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::FixedRoll;
    use crate::save::MemoryStore;

    fn open_fresh(roll: f64) -> Session<MemoryStore, FixedRoll> {
        Session::open(Catalog::builtin(), MemoryStore::new(), FixedRoll(roll), 0.0)
    }

    #[test]
    fn opens_fresh_state() {
        let session = open_fresh(0.0);
        assert_eq!(session.state(), &GameState::new(session.catalog(), 0.0));
        assert!(session.store().blob().is_none());
    }

    #[test]
    fn advance_runs_fixed_ticks() {
        let mut session = open_fresh(0.0);
        assert_eq!(session.advance(250.0), 2);
        assert!((session.state().honks - 0.2).abs() < 1e-9);
        assert_eq!(session.advance(300.0), 1);
        assert!((session.state().honks - 0.3).abs() < 1e-9);
    }

    #[test]
    fn autosaves_after_interval() {
        let mut session = open_fresh(0.0);
        for i in 1..20 {
            session.advance(i as f64 * 500.0);
        }
        assert!(session.store().blob().is_none());
        session.advance(10_000.0);
        assert!(session.store().blob().is_some());
    }

    #[test]
    fn apply_reports_applied_flag() {
        let mut session = open_fresh(0.0);
        assert!(session.apply(Action::Click));
        assert!((session.state().honks - 1.0).abs() < 1e-9);
        assert!(!session.apply(Action::BuyUpgrade("better_goose".into())));
        assert!(!session.apply(Action::BuyUpgrade("nonexistent".into())));
        assert!(!session.apply(Action::SelectRegion("global_stage".into())));
        assert!(!session.apply(Action::SelectCostume("scientist".into())));
        assert!(!session.apply(Action::EfficiencyAudit));
        assert!(!session.apply(Action::Accredit));
        assert!(!session.apply(Action::BuyLegacyUpgrade("golden_resonance".into())));
        assert!(session.apply(Action::SelectCollege("athletic_department".into())));
        assert_eq!(session.state().selected_college_ids, vec!["athletic_department"]);
    }

    #[test]
    fn battle_respects_cooldown() {
        let mut session = open_fresh(0.0);
        assert!(session.apply(Action::Battle("pond_tech".into())));
        assert!((session.state().reputation - 1.0).abs() < 1e-9);
        assert!(!session.apply(Action::Battle("pond_tech".into())));

        // Live frames are clamped, so walk the clock forward 30 s.
        for i in 1..=60 {
            session.advance(i as f64 * 500.0);
        }
        assert!(session.state().battle_state.is_ready());
        assert!(session.apply(Action::Battle("pond_tech".into())));
    }

    #[test]
    fn losing_battle_still_applies() {
        let mut session = open_fresh(1.0);
        assert!(session.apply(Action::Battle("pond_tech".into())));
        assert_eq!(session.state().reputation, 0.0);
        assert!(!session.state().battle_state.is_ready());
    }

    #[test]
    fn reopen_catches_up() {
        let mut session = open_fresh(0.0);
        session.apply(Action::Click);
        session.save_now(1_000.0).unwrap();

        let store = session.store().clone();
        let reopened = Session::open(Catalog::builtin(), store, FixedRoll(0.0), 61_000.0);
        assert!((reopened.state().honks - 61.0).abs() < 1e-9);
    }

    #[test]
    fn reset_clears_save() {
        let mut session = open_fresh(0.0);
        session.apply(Action::Click);
        session.save_now(0.0).unwrap();
        session.reset(1_000.0);
        assert!(session.store().blob().is_none());
        assert_eq!(session.state().honks, 0.0);
        assert_eq!(session.advance(1_000.0), 0);
    }
}
