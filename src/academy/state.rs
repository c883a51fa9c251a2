//! Bee-Kay Academy economy state and the static catalogs it is keyed by.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds since the Unix epoch.
pub type Timestamp = u64;

pub const FRUIT_SNACK_COST: f64 = 50.0;
pub const FRUIT_SNACK_DURATION_MS: u64 = 30_000;
pub const AUTO_BOOST_COST: f64 = 5_000.0;
pub const CRITICAL_STUDY_DURATION_MS: u64 = 10_000;
pub const PRODUCTION_HALT_DURATION_MS: u64 = 20_000;
/// Share of current papers kept after the Sentinel confiscates evidence.
pub const EVIDENCE_KEEP_RATIO: f64 = 0.9;
/// Absences this short are not worth a catch-up.
pub const OFFLINE_MIN_SECONDS: u64 = 10;
pub const OFFLINE_RATE: f64 = 0.5;
pub const OFFLINE_RATE_TIER3: f64 = 0.75;
pub const MAX_PRESTIGE_TIER: u8 = 3;

/// An id string that does not name anything in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {catalog} id: {id:?}")]
pub struct UnknownId {
    pub catalog: &'static str,
    pub id: String,
}

// ── Units ──────────────────────────────────────────────────────

/// Students that write papers on their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Daydreamer,
    Overachiever,
    VarsityBobkat,
    AiWhiz,
    RogueGraduate,
}

impl UnitKind {
    /// All units in shop order.
    pub fn all() -> &'static [UnitKind] {
        &[
            UnitKind::Daydreamer,
            UnitKind::Overachiever,
            UnitKind::VarsityBobkat,
            UnitKind::AiWhiz,
            UnitKind::RogueGraduate,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            UnitKind::Daydreamer => "daydreamer",
            UnitKind::Overachiever => "overachiever",
            UnitKind::VarsityBobkat => "varsity-bobkat",
            UnitKind::AiWhiz => "ai-whiz",
            UnitKind::RogueGraduate => "rogue-graduate",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Daydreamer => "Daydreamer",
            UnitKind::Overachiever => "Overachiever",
            UnitKind::VarsityBobkat => "Varsity Bobkat",
            UnitKind::AiWhiz => "AI-Whiz",
            UnitKind::RogueGraduate => "Rogue Graduate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UnitKind::Daydreamer => "Gazes out the window, occasionally scribbles notes",
            UnitKind::Overachiever => "Hand always raised, extra credit obsessed",
            UnitKind::VarsityBobkat => "Sports star with surprising paper skills",
            UnitKind::AiWhiz => "Codes during lunch, automates everything",
            UnitKind::RogueGraduate => "Returned from college to lead the resistance",
        }
    }

    /// Price of the first copy.
    pub fn base_cost(&self) -> f64 {
        match self {
            UnitKind::Daydreamer => 15.0,
            UnitKind::Overachiever => 100.0,
            UnitKind::VarsityBobkat => 500.0,
            UnitKind::AiWhiz => 2_500.0,
            UnitKind::RogueGraduate => 10_000.0,
        }
    }

    /// Papers per second per copy, before multipliers.
    pub fn base_yield(&self) -> f64 {
        match self {
            UnitKind::Daydreamer => 0.05,
            UnitKind::Overachiever => 0.30,
            UnitKind::VarsityBobkat => 1.80,
            UnitKind::AiWhiz => 10.0,
            UnitKind::RogueGraduate => 60.0,
        }
    }
}

impl FromStr for UnitKind {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitKind::all()
            .iter()
            .copied()
            .find(|u| u.id() == s)
            .ok_or_else(|| UnknownId {
                catalog: "unit",
                id: s.to_string(),
            })
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ── Blueprints ─────────────────────────────────────────────────

/// Pieces of the Wooden Park, bought with golden splinters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Blueprint {
    Steps,
    Slide,
    Swing,
    Walls,
    Statue,
}

impl Blueprint {
    pub fn all() -> &'static [Blueprint] {
        &[
            Blueprint::Steps,
            Blueprint::Slide,
            Blueprint::Swing,
            Blueprint::Walls,
            Blueprint::Statue,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Blueprint::Steps => "steps",
            Blueprint::Slide => "slide",
            Blueprint::Swing => "swing",
            Blueprint::Walls => "walls",
            Blueprint::Statue => "statue",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Blueprint::Steps => "The Steps",
            Blueprint::Slide => "The Cedar Slide",
            Blueprint::Swing => "The Swings",
            Blueprint::Walls => "The Walls",
            Blueprint::Statue => "The Founder Statue",
        }
    }

    pub fn effect(&self) -> &'static str {
        match self {
            Blueprint::Steps => "+20% Click Power",
            Blueprint::Slide => "1.5x Passive Yield",
            Blueprint::Swing => "-50% Antagonist Frequency",
            Blueprint::Walls => "3x Paper Value",
            Blueprint::Statue => "Victory Achieved!",
        }
    }

    /// Price in golden splinters.
    pub fn cost(&self) -> u64 {
        match self {
            Blueprint::Steps => 100,
            Blueprint::Slide => 250,
            Blueprint::Swing => 500,
            Blueprint::Walls => 1_000,
            Blueprint::Statue => 2_500,
        }
    }
}

impl FromStr for Blueprint {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Blueprint::all()
            .iter()
            .copied()
            .find(|b| b.id() == s)
            .ok_or_else(|| UnknownId {
                catalog: "blueprint",
                id: s.to_string(),
            })
    }
}

impl fmt::Display for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ── Prestige tiers ─────────────────────────────────────────────

/// One rung of the permanent prestige ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrestigeTier {
    pub tier: u8,
    pub name: &'static str,
    pub effect: &'static str,
    /// Price in golden splinters.
    pub cost: u64,
}

pub static PRESTIGE_TIERS: [PrestigeTier; 3] = [
    PrestigeTier {
        tier: 1,
        name: "Honor Roll",
        effect: "+100% Click Power",
        cost: 25,
    },
    PrestigeTier {
        tier: 2,
        name: "Dean's List",
        effect: "Opens the Valedictorian tier",
        cost: 100,
    },
    PrestigeTier {
        tier: 3,
        name: "Valedictorian",
        effect: "Offline earnings 75% (was 50%)",
        cost: 400,
    },
];

/// Catalog entry for `tier`, if it exists.
pub fn prestige_tier(tier: u8) -> Option<&'static PrestigeTier> {
    PRESTIGE_TIERS.iter().find(|t| t.tier == tier)
}

// ── Buffs ──────────────────────────────────────────────────────

/// Timed effects. All of them expire through the same sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuffKind {
    /// Bought boost: production x2.
    FruitSnack,
    /// Reward for a fast slide-to-study: production and clicks x5.
    CriticalStudy,
    /// Chef Soggy's penalty: passive production stops.
    ProductionHalt,
}

impl BuffKind {
    /// Whether a snapshot should carry this buff across a reload.
    pub fn persists(&self) -> bool {
        !matches!(self, BuffKind::CriticalStudy)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuffKind::FruitSnack => "Fruit Snack x2",
            BuffKind::CriticalStudy => "Critical Study x5",
            BuffKind::ProductionHalt => "Detention: production stopped",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    pub expires_at: Timestamp,
}

// ── Antagonists ────────────────────────────────────────────────

/// Who interrupted study time, and therefore which penalty applies on failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AntagonistKind {
    /// Chef Soggy: production halt for 20 seconds.
    ChefSoggy,
    /// The Sentinel: confiscates 10% of current papers.
    Sentinel,
}

impl AntagonistKind {
    pub fn title(&self) -> &'static str {
        match self {
            AntagonistKind::ChefSoggy => "Chef Soggy",
            AntagonistKind::Sentinel => "The Sentinel",
        }
    }

    pub fn line(&self) -> &'static str {
        match self {
            AntagonistKind::ChefSoggy => "Mystery Meatloaf for everyone! Pens down!",
            AntagonistKind::Sentinel => "Those papers look like evidence to me.",
        }
    }

    pub fn penalty(&self) -> &'static str {
        match self {
            AntagonistKind::ChefSoggy => "Fail: Production stops for 20 seconds",
            AntagonistKind::Sentinel => "Fail: Lose 10% of your papers",
        }
    }

    /// Seconds the player has to slide to study.
    pub fn window_secs(&self) -> u64 {
        match self {
            AntagonistKind::ChefSoggy => 8,
            AntagonistKind::Sentinel => 5,
        }
    }
}

// ── Economy state ──────────────────────────────────────────────

/// The whole persisted economy.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Spendable papers. Not clamped.
    pub current_papers: f64,
    /// Papers produced this graduation cycle. Basis for splinters.
    pub total_papers_lifetime: f64,
    pub golden_splinters: u64,
    /// Every splinter ever gained. Never spent down.
    pub total_splinters_earned: u64,
    /// Owned blueprints in purchase order, no duplicates.
    pub unlocked_blueprints: Vec<Blueprint>,
    pub units: BTreeMap<UnitKind, u32>,
    pub buffs: Vec<ActiveBuff>,
    pub auto_boost_purchased: bool,
    pub auto_boost_enabled: bool,
    pub prestige_tier: u8,
    pub antagonists_defeated: u32,
    pub highest_goal_reached: u32,
    pub has_seen_victory: bool,
    pub has_seen_intro: bool,
    pub last_save_timestamp: Timestamp,
}

impl EconomyState {
    pub fn new(now: Timestamp) -> Self {
        Self {
            current_papers: 0.0,
            total_papers_lifetime: 0.0,
            golden_splinters: 0,
            total_splinters_earned: 0,
            unlocked_blueprints: Vec::new(),
            units: BTreeMap::new(),
            buffs: Vec::new(),
            auto_boost_purchased: false,
            auto_boost_enabled: false,
            prestige_tier: 0,
            antagonists_defeated: 0,
            highest_goal_reached: 0,
            has_seen_victory: false,
            has_seen_intro: false,
            last_save_timestamp: now,
        }
    }

    pub fn owned(&self, unit: UnitKind) -> u32 {
        self.units.get(&unit).copied().unwrap_or(0)
    }

    pub fn has_blueprint(&self, blueprint: Blueprint) -> bool {
        self.unlocked_blueprints.contains(&blueprint)
    }

    /// All five pieces owned.
    pub fn is_victorious(&self) -> bool {
        self.has_blueprint(Blueprint::Statue)
    }

    /// A buff counts only while `now` is before its expiry.
    pub fn buff_active(&self, kind: BuffKind, now: Timestamp) -> bool {
        self.buffs
            .iter()
            .any(|b| b.kind == kind && now < b.expires_at)
    }

    /// Milliseconds left on `kind`, zero when inactive.
    pub fn buff_remaining_ms(&self, kind: BuffKind, now: Timestamp) -> u64 {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.expires_at.saturating_sub(now))
            .max()
            .unwrap_or(0)
    }

    /// Start `kind` for `duration_ms`, replacing any running instance.
    pub fn start_buff(&mut self, kind: BuffKind, now: Timestamp, duration_ms: u64) {
        self.buffs.retain(|b| b.kind != kind);
        self.buffs.push(ActiveBuff {
            kind,
            expires_at: now + duration_ms,
        });
    }

    /// Drop every buff whose expiry has passed.
    pub fn sweep_buffs(&mut self, now: Timestamp) {
        self.buffs.retain(|b| now < b.expires_at);
    }

    /// Base papers per second from units alone.
    pub fn base_production(&self) -> f64 {
        self.units
            .iter()
            .map(|(unit, &count)| count as f64 * unit.base_yield())
            .sum()
    }
}
