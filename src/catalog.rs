//! Goose University configuration catalog.
//!
//! The engine only ever reads a [`Catalog`]: upgrade lists, unlock thresholds,
//! colleges, rivals, regions and the named balancing constants. A catalog is
//! validated once when it is built from JSON; the shipped content lives in
//! [`Catalog::builtin`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Variant families ────────────────────────────────────────────

/// How an upgrade's price grows with its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostScaling {
    /// `base_cost + level * cost_factor`
    Linear,
    /// `floor(base_cost * cost_factor ^ level)`
    Exponential,
}

/// How an upgrade contributes to the honk rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeEffect {
    /// Adds `effect_value * level` honks/sec to the base rate.
    Add,
    /// Multiplies the rate by `effect_value ^ level`.
    Multiply,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryStat {
    HonkBonus,
    MultiplierBonus,
    CooldownReduction,
    PowerBonus,
    ReputationBonus,
}

/// Battle archetype. The first four form a dominance cycle; `Balanced`
/// neither beats nor loses to anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticalType {
    Aggressive,
    Intellectual,
    Adaptive,
    Creative,
    Balanced,
}

impl TacticalType {
    /// Aggressive > Intellectual > Adaptive > Creative > Aggressive.
    pub fn beats(self, other: TacticalType) -> bool {
        matches!(
            (self, other),
            (TacticalType::Aggressive, TacticalType::Intellectual)
                | (TacticalType::Intellectual, TacticalType::Adaptive)
                | (TacticalType::Adaptive, TacticalType::Creative)
                | (TacticalType::Creative, TacticalType::Aggressive)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyEffect {
    HonkMult,
    PowerMult,
    StudentMult,
    FundingMult,
}

// ── Records ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: f64,
    pub cost_scaling: CostScaling,
    /// Additive step for linear scaling, growth ratio for exponential.
    pub cost_factor: f64,
    pub effect_type: UpgradeEffect,
    pub effect_value: f64,
    /// Unlock that must be latched before this upgrade can be bought.
    #[serde(default)]
    pub req_unlock_id: Option<String>,
}

/// Threshold-gated permanent multiplier, keyed by lifetime honks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockDef {
    pub id: String,
    pub name: String,
    pub threshold: f64,
    pub multiplier: f64,
    #[serde(default)]
    pub costume_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUpgradeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: u64,
    pub effect_type: LegacyEffect,
    pub effect_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub primary_stat: PrimaryStat,
    pub tactical_type: TacticalType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RivalDef {
    pub id: String,
    pub name: String,
    pub base_power: f64,
    pub reward_reputation: f64,
    pub reward_honks: f64,
    pub tactical_type: TacticalType,
    #[serde(default)]
    pub is_boss: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unlock_reputation: f64,
    pub rival_ids: Vec<String>,
    pub boss_id: String,
    pub multiplier: f64,
}

/// Ids a brand-new save starts with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDef {
    pub region_id: String,
    pub college_id: String,
    pub costume_id: String,
}

impl Default for StartDef {
    fn default() -> Self {
        Self {
            region_id: "local_ponds".into(),
            college_id: "college_of_honkery".into(),
            costume_id: "default".into(),
        }
    }
}

/// Named balancing constants ("Hard Mode" values by default).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Constants {
    pub initial_honks_per_second: f64,
    pub autosave_interval_ms: f64,
    pub battle_cooldown_ms: f64,
    pub students_per_honk_sec: f64,
    pub funding_per_student_sec: f64,
    pub ascension_threshold: f64,
    pub rival_scaling_per_victory: f64,
    pub friction_per_10_upgrades: f64,
    /// Lowest value the friction multiplier may reach.
    pub friction_floor: f64,
    /// Per-purchase decay base; the rate is multiplied by `base ^ purchases`.
    pub inflation_base: f64,
    pub audit_base_cost_honks: f64,
    pub audit_base_cost_funding: f64,
    pub tactical_multiplier: f64,
    pub click_honks: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            initial_honks_per_second: 1.0,
            autosave_interval_ms: 10_000.0,
            battle_cooldown_ms: 30_000.0,
            students_per_honk_sec: 0.01,
            funding_per_student_sec: 0.001,
            ascension_threshold: 10_000_000.0,
            rival_scaling_per_victory: 1.05,
            friction_per_10_upgrades: 0.01,
            friction_floor: 0.1,
            inflation_base: 0.995,
            audit_base_cost_honks: 1_000_000.0,
            audit_base_cost_funding: 5_000.0,
            tactical_multiplier: 1.5,
            click_honks: 1.0,
        }
    }
}

// ── Catalog ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {family} id `{id}`")]
    DuplicateId { family: &'static str, id: String },
    #[error("`{from}` refers to unknown {family} `{id}`")]
    UnknownReference {
        from: String,
        family: &'static str,
        id: String,
    },
    #[error("constant {name} is out of range: {value}")]
    InvalidConstant { name: &'static str, value: f64 },
}

/// Immutable game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub constants: Constants,
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    #[serde(default)]
    pub unlocks: Vec<UnlockDef>,
    #[serde(default)]
    pub legacy_upgrades: Vec<LegacyUpgradeDef>,
    #[serde(default)]
    pub colleges: Vec<CollegeDef>,
    #[serde(default)]
    pub rivals: Vec<RivalDef>,
    #[serde(default)]
    pub regions: Vec<RegionDef>,
    #[serde(default)]
    pub start: StartDef,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn unlock(&self, id: &str) -> Option<&UnlockDef> {
        self.unlocks.iter().find(|u| u.id == id)
    }

    pub fn legacy_upgrade(&self, id: &str) -> Option<&LegacyUpgradeDef> {
        self.legacy_upgrades.iter().find(|u| u.id == id)
    }

    pub fn college(&self, id: &str) -> Option<&CollegeDef> {
        self.colleges.iter().find(|c| c.id == id)
    }

    pub fn rival(&self, id: &str) -> Option<&RivalDef> {
        self.rivals.iter().find(|r| r.id == id)
    }

    pub fn region(&self, id: &str) -> Option<&RegionDef> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Check id uniqueness, cross references and constant ranges.
    pub fn validate(&self) -> Result<(), CatalogError> {
        unique_ids("upgrade", self.upgrades.iter().map(|u| u.id.as_str()))?;
        unique_ids("unlock", self.unlocks.iter().map(|u| u.id.as_str()))?;
        unique_ids(
            "legacy upgrade",
            self.legacy_upgrades.iter().map(|u| u.id.as_str()),
        )?;
        unique_ids("college", self.colleges.iter().map(|c| c.id.as_str()))?;
        unique_ids("rival", self.rivals.iter().map(|r| r.id.as_str()))?;
        unique_ids("region", self.regions.iter().map(|r| r.id.as_str()))?;

        for upgrade in &self.upgrades {
            if let Some(req) = &upgrade.req_unlock_id {
                if self.unlock(req).is_none() {
                    return Err(unknown(&upgrade.id, "unlock", req));
                }
            }
        }
        for region in &self.regions {
            for rival_id in region.rival_ids.iter().chain(std::iter::once(&region.boss_id)) {
                if self.rival(rival_id).is_none() {
                    return Err(unknown(&region.id, "rival", rival_id));
                }
            }
        }
        if self.region(&self.start.region_id).is_none() {
            return Err(unknown("start", "region", &self.start.region_id));
        }
        if self.college(&self.start.college_id).is_none() {
            return Err(unknown("start", "college", &self.start.college_id));
        }

        let c = &self.constants;
        let positive = [
            ("ASCENSION_THRESHOLD", c.ascension_threshold),
            ("RIVAL_SCALING_PER_VICTORY", c.rival_scaling_per_victory),
            ("INFLATION_BASE", c.inflation_base),
            ("TACTICAL_MULTIPLIER", c.tactical_multiplier),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(CatalogError::InvalidConstant { name, value });
            }
        }
        let non_negative = [
            ("INITIAL_HONKS_PER_SECOND", c.initial_honks_per_second),
            ("BATTLE_COOLDOWN_MS", c.battle_cooldown_ms),
            ("FRICTION_PER_10_UPGRADES", c.friction_per_10_upgrades),
            ("FRICTION_FLOOR", c.friction_floor),
            ("CLICK_HONKS", c.click_honks),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(CatalogError::InvalidConstant { name, value });
            }
        }
        if c.inflation_base > 1.0 {
            return Err(CatalogError::InvalidConstant {
                name: "INFLATION_BASE",
                value: c.inflation_base,
            });
        }
        Ok(())
    }

    /// The shipped Goose University content.
    pub fn builtin() -> Self {
        Self {
            constants: Constants::default(),
            upgrades: builtin_upgrades(),
            unlocks: builtin_unlocks(),
            legacy_upgrades: builtin_legacy_upgrades(),
            colleges: builtin_colleges(),
            rivals: builtin_rivals(),
            regions: builtin_regions(),
            start: StartDef::default(),
        }
    }
}

fn unique_ids<'a>(
    family: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                family,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn unknown(from: &str, family: &'static str, id: &str) -> CatalogError {
    CatalogError::UnknownReference {
        from: from.to_string(),
        family,
        id: id.to_string(),
    }
}

// ── Built-in content ────────────────────────────────────────────

/// `(base_cost, scaling, cost_factor)`
type Pricing = (f64, CostScaling, f64);

fn upgrade(
    id: &str,
    name: &str,
    description: &str,
    (base_cost, cost_scaling, cost_factor): Pricing,
    effect_value: f64,
    req_unlock_id: Option<&str>,
) -> UpgradeDef {
    UpgradeDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        base_cost,
        cost_scaling,
        cost_factor,
        effect_type: UpgradeEffect::Add,
        effect_value,
        req_unlock_id: req_unlock_id.map(Into::into),
    }
}

fn builtin_upgrades() -> Vec<UpgradeDef> {
    use CostScaling::{Exponential, Linear};
    const DIVISION: Option<&str> = Some("division_of_feathered_sciences");
    vec![
        upgrade(
            "better_goose",
            "Better Goose",
            "Increases honks per second by 1.",
            (25.0, Linear, 5.0),
            1.0,
            None,
        ),
        upgrade(
            "high_res_microscopes",
            "High-Res Microscopes",
            "Adds +5 power to Sciences.",
            (10.0, Exponential, 1.8),
            5.0,
            DIVISION,
        ),
        upgrade(
            "resonance_chambers",
            "Resonance Chambers",
            "Adds +25 power to Sciences.",
            (50.0, Exponential, 2.2),
            25.0,
            DIVISION,
        ),
        upgrade(
            "star_charts",
            "Star Charts",
            "Adds +10 power to Migratory.",
            (10.0, Exponential, 1.8),
            10.0,
            DIVISION,
        ),
        upgrade(
            "premium_birdseed",
            "Premium Birdseed",
            "Adds +20 power to Athletics.",
            (10.0, Exponential, 1.8),
            20.0,
            DIVISION,
        ),
        upgrade(
            "gilded_quills",
            "Gilded Quills",
            "Adds +15 power to Arts.",
            (10.0, Exponential, 1.8),
            15.0,
            DIVISION,
        ),
        upgrade(
            "research_lab",
            "Research Lab",
            "Adds +5 Honks/sec. Requires College.",
            (500.0, Linear, 50.0),
            5.0,
            Some("college_of_honkery"),
        ),
    ]
}

fn builtin_unlocks() -> Vec<UnlockDef> {
    let unlock = |id: &str, name: &str, threshold: f64, costume_id: Option<&str>| UnlockDef {
        id: id.into(),
        name: name.into(),
        threshold,
        multiplier: 1.01,
        costume_id: costume_id.map(Into::into),
    };
    vec![
        unlock("college_of_honkery", "College of Honkery", 500.0, None),
        unlock(
            "division_of_feathered_sciences",
            "Division of Feathered Sciences",
            100_000.0,
            Some("scientist"),
        ),
        unlock(
            "dept_athletic_excellence",
            "Athletic Excellence",
            500_000.0,
            Some("athlete"),
        ),
    ]
}

fn builtin_legacy_upgrades() -> Vec<LegacyUpgradeDef> {
    vec![
        LegacyUpgradeDef {
            id: "golden_resonance".into(),
            name: "Golden Resonance".into(),
            description: "Permanently increases Honk rate by 10% per level.".into(),
            base_cost: 1,
            effect_type: LegacyEffect::HonkMult,
            effect_value: 0.1,
        },
        LegacyUpgradeDef {
            id: "avian_diplomacy".into(),
            name: "Avian Diplomacy".into(),
            description: "Permanently increases Battle Power per level.".into(),
            base_cost: 2,
            effect_type: LegacyEffect::PowerMult,
            effect_value: 0.2,
        },
        LegacyUpgradeDef {
            id: "recruitment_drive".into(),
            name: "Recruitment Drive".into(),
            description: "Increases student enrollment speed by 25% per level.".into(),
            base_cost: 3,
            effect_type: LegacyEffect::StudentMult,
            effect_value: 0.25,
        },
    ]
}

fn builtin_colleges() -> Vec<CollegeDef> {
    let college = |id: &str, name: &str, description: &str, stat, tactical| CollegeDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        primary_stat: stat,
        tactical_type: tactical,
    };
    vec![
        college(
            "college_of_honkery",
            "College of Honkery",
            "The foundation of all honking. Increases base honk output.",
            PrimaryStat::HonkBonus,
            TacticalType::Balanced,
        ),
        college(
            "division_of_feathered_sciences",
            "Division of Feathered Sciences",
            "Experimental honk resonance. Increases all multipliers.",
            PrimaryStat::MultiplierBonus,
            TacticalType::Intellectual,
        ),
        college(
            "dept_migratory_studies",
            "Dept. of Migratory Studies",
            "Efficient movement. Reduces battle cooldowns.",
            PrimaryStat::CooldownReduction,
            TacticalType::Adaptive,
        ),
        college(
            "athletic_department",
            "Athletic Department",
            "Physical excellence. Provides a direct bonus to battle power.",
            PrimaryStat::PowerBonus,
            TacticalType::Aggressive,
        ),
        college(
            "school_avian_arts",
            "School of Avian Arts",
            "Performative honking. Increases reputation gains from victory.",
            PrimaryStat::ReputationBonus,
            TacticalType::Creative,
        ),
    ]
}

fn builtin_rivals() -> Vec<RivalDef> {
    use TacticalType::*;
    let rival = |id: &str,
                 name: &str,
                 base_power: f64,
                 reward_reputation: f64,
                 reward_honks: f64,
                 tactical_type: TacticalType,
                 is_boss: bool| RivalDef {
        id: id.into(),
        name: name.into(),
        base_power,
        reward_reputation,
        reward_honks,
        tactical_type,
        is_boss,
    };
    vec![
        // Local Ponds
        rival("pond_tech", "Pond Tech", 10.0, 1.0, 100.0, Adaptive, false),
        rival("river_state", "River State", 50.0, 5.0, 500.0, Aggressive, false),
        rival("swan_king", "The Swan King", 200.0, 25.0, 2_500.0, Balanced, true),
        // Academic City
        rival("maple_inst", "Maple Institute", 500.0, 50.0, 10_000.0, Creative, false),
        rival("northern_u", "Northern U", 2_000.0, 100.0, 50_000.0, Intellectual, false),
        rival("dean_mallard", "Dean Mallard", 10_000.0, 500.0, 250_000.0, Balanced, true),
        // Global Stage
        rival("lakeside", "Lakeside College", 50_000.0, 1_000.0, 1_000_000.0, Adaptive, false),
        rival("oceanic_state", "Oceanic State", 250_000.0, 2_500.0, 5_000_000.0, Aggressive, false),
        rival("great_goose", "The Great Goose", 1_000_000.0, 10_000.0, 25_000_000.0, Balanced, true),
    ]
}

fn builtin_regions() -> Vec<RegionDef> {
    let region = |id: &str,
                  name: &str,
                  description: &str,
                  unlock_reputation: f64,
                  rival_ids: [&str; 2],
                  boss_id: &str,
                  multiplier: f64| RegionDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        unlock_reputation,
        rival_ids: rival_ids.iter().map(|r| r.to_string()).collect(),
        boss_id: boss_id.into(),
        multiplier,
    };
    vec![
        region(
            "local_ponds",
            "Local Ponds",
            "Where every goose begins their journey.",
            0.0,
            ["pond_tech", "river_state"],
            "swan_king",
            1.0,
        ),
        region(
            "academic_city",
            "Academic City",
            "The urban jungle of elite avian scholars.",
            50.0,
            ["maple_inst", "northern_u"],
            "dean_mallard",
            2.0,
        ),
        region(
            "global_stage",
            "Global Stage",
            "The highest peak of university recognition.",
            1_000.0,
            ["lakeside", "oceanic_state"],
            "great_goose",
            5.0,
        ),
    ]
}
