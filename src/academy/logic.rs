//! Bee-Kay Academy economy rules: pure functions over `EconomyState`.
//!
//! Every action either applies completely or leaves the state untouched and
//! reports that through its return value. Time-dependent rules take the
//! caller's wall clock so tests can drive them directly.

use super::formula::{splinter_multiplier, splinters_for, unit_cost};
use super::state::{
    prestige_tier, AntagonistKind, Blueprint, BuffKind, EconomyState, Timestamp, UnitKind,
    AUTO_BOOST_COST, CRITICAL_STUDY_DURATION_MS, EVIDENCE_KEEP_RATIO, FRUIT_SNACK_COST,
    FRUIT_SNACK_DURATION_MS, OFFLINE_MIN_SECONDS, OFFLINE_RATE, OFFLINE_RATE_TIER3,
    PRODUCTION_HALT_DURATION_MS,
};

fn blueprint_mult(state: &EconomyState, blueprint: Blueprint, factor: f64) -> f64 {
    if state.has_blueprint(blueprint) {
        factor
    } else {
        1.0
    }
}

fn buff_mult(state: &EconomyState, kind: BuffKind, now: Timestamp, factor: f64) -> f64 {
    if state.buff_active(kind, now) {
        factor
    } else {
        1.0
    }
}

/// Papers per second from units and permanent bonuses only.
/// This is the rate offline catch-up pays out on.
pub fn passive_rate_without_buffs(state: &EconomyState) -> f64 {
    state.base_production()
        * splinter_multiplier(state.golden_splinters)
        * blueprint_mult(state, Blueprint::Slide, 1.5)
        * blueprint_mult(state, Blueprint::Walls, 3.0)
}

/// Papers per second right now, including timed buffs.
pub fn passive_income(state: &EconomyState, now: Timestamp) -> f64 {
    if state.buff_active(BuffKind::ProductionHalt, now) {
        return 0.0;
    }
    passive_rate_without_buffs(state)
        * buff_mult(state, BuffKind::FruitSnack, now, 2.0)
        * buff_mult(state, BuffKind::CriticalStudy, now, 5.0)
}

/// Papers gained by one manual click.
pub fn click_power(state: &EconomyState, now: Timestamp) -> f64 {
    let prestige_mult = if state.prestige_tier >= 1 { 2.0 } else { 1.0 };
    splinter_multiplier(state.golden_splinters)
        * blueprint_mult(state, Blueprint::Steps, 1.2)
        * blueprint_mult(state, Blueprint::Walls, 3.0)
        * prestige_mult
        * buff_mult(state, BuffKind::CriticalStudy, now, 5.0)
}

/// Advance the economy by one second. Returns the papers produced.
pub fn tick(state: &mut EconomyState, now: Timestamp) -> f64 {
    state.sweep_buffs(now);

    // Auto-boost fires before income so the snack counts this very second.
    if state.auto_boost_purchased
        && state.auto_boost_enabled
        && !state.buff_active(BuffKind::FruitSnack, now)
        && state.current_papers >= FRUIT_SNACK_COST
    {
        state.current_papers -= FRUIT_SNACK_COST;
        state.start_buff(BuffKind::FruitSnack, now, FRUIT_SNACK_DURATION_MS);
    }

    let income = passive_income(state, now);
    state.current_papers += income;
    state.total_papers_lifetime += income;
    income
}

/// Manual click. Returns the papers added, for the floating "+N".
pub fn click(state: &mut EconomyState, now: Timestamp) -> f64 {
    let power = click_power(state, now);
    state.current_papers += power;
    state.total_papers_lifetime += power;
    power
}

/// Current price of the next copy of `unit`.
pub fn unit_price(state: &EconomyState, unit: UnitKind) -> f64 {
    unit_cost(unit.base_cost(), state.owned(unit))
}

/// Try to recruit one `unit`. Returns true if successful.
pub fn buy_unit(state: &mut EconomyState, unit: UnitKind) -> bool {
    let cost = unit_price(state, unit);
    if state.current_papers < cost {
        return false;
    }
    state.current_papers -= cost;
    *state.units.entry(unit).or_insert(0) += 1;
    true
}

/// Buy a fruit snack: production x2 for 30 seconds.
pub fn activate_boost(state: &mut EconomyState, now: Timestamp) -> bool {
    if state.current_papers < FRUIT_SNACK_COST {
        return false;
    }
    state.current_papers -= FRUIT_SNACK_COST;
    state.start_buff(BuffKind::FruitSnack, now, FRUIT_SNACK_DURATION_MS);
    true
}

/// One-time purchase of the auto-boost, which starts enabled.
pub fn purchase_auto_boost(state: &mut EconomyState) -> bool {
    if state.auto_boost_purchased || state.current_papers < AUTO_BOOST_COST {
        return false;
    }
    state.current_papers -= AUTO_BOOST_COST;
    state.auto_boost_purchased = true;
    state.auto_boost_enabled = true;
    true
}

/// Flip the auto-boost switch. Does nothing until it is purchased.
pub fn toggle_auto_boost(state: &mut EconomyState) {
    if state.auto_boost_purchased {
        state.auto_boost_enabled = !state.auto_boost_enabled;
    }
}

/// Unlock a blueprint with splinters. Owned pieces cannot be bought twice.
pub fn buy_blueprint(state: &mut EconomyState, blueprint: Blueprint) -> bool {
    let cost = blueprint.cost();
    if state.has_blueprint(blueprint) || state.golden_splinters < cost {
        return false;
    }
    state.golden_splinters -= cost;
    state.unlocked_blueprints.push(blueprint);
    true
}

/// Climb to `tier` on the prestige ladder. Tiers must be bought in order.
pub fn purchase_prestige_tier(state: &mut EconomyState, tier: u8) -> bool {
    let Some(def) = prestige_tier(tier) else {
        return false;
    };
    if state.prestige_tier + 1 != tier || state.golden_splinters < def.cost {
        return false;
    }
    state.golden_splinters -= def.cost;
    state.prestige_tier = tier;
    true
}

/// Splinters a graduation would add right now (0 if it would not help).
pub fn pending_splinter_gain(state: &EconomyState) -> u64 {
    splinters_for(state.total_papers_lifetime).saturating_sub(state.golden_splinters)
}

/// Graduate: trade this cycle's papers and students for golden splinters.
/// Returns the number of splinters gained, or 0 if graduating would not
/// raise the splinter count (state is left unchanged in that case).
pub fn graduate(state: &mut EconomyState, now: Timestamp) -> u64 {
    let new_splinters = splinters_for(state.total_papers_lifetime);
    if new_splinters <= state.golden_splinters {
        return 0;
    }
    let gain = new_splinters - state.golden_splinters;

    let mut next = EconomyState::new(now);
    next.golden_splinters = new_splinters;
    next.total_splinters_earned = state.total_splinters_earned + gain;
    next.unlocked_blueprints = std::mem::take(&mut state.unlocked_blueprints);
    next.antagonists_defeated = state.antagonists_defeated;
    next.auto_boost_purchased = state.auto_boost_purchased;
    next.auto_boost_enabled = state.auto_boost_enabled;
    next.prestige_tier = state.prestige_tier;
    next.highest_goal_reached = state.highest_goal_reached;
    next.has_seen_victory = state.has_seen_victory;
    next.has_seen_intro = state.has_seen_intro;

    log::info!(
        "graduated: +{gain} splinters (holding {new_splinters}) after {:.0} lifetime papers",
        state.total_papers_lifetime
    );
    *state = next;
    gain
}

/// Penalty for letting an antagonist win.
pub fn apply_penalty(state: &mut EconomyState, kind: AntagonistKind, now: Timestamp) {
    match kind {
        AntagonistKind::ChefSoggy => {
            state.start_buff(BuffKind::ProductionHalt, now, PRODUCTION_HALT_DURATION_MS);
        }
        AntagonistKind::Sentinel => {
            state.current_papers *= EVIDENCE_KEEP_RATIO;
        }
    }
}

/// Production and clicks x5 for 10 seconds.
pub fn trigger_critical_study(state: &mut EconomyState, now: Timestamp) {
    state.start_buff(BuffKind::CriticalStudy, now, CRITICAL_STUDY_DURATION_MS);
}

/// Share of the passive rate paid for time spent away.
pub fn offline_rate(state: &EconomyState) -> f64 {
    if state.prestige_tier >= 3 {
        OFFLINE_RATE_TIER3
    } else {
        OFFLINE_RATE
    }
}

/// Pay out production for the time since the last snapshot.
///
/// Returns the amount credited for the welcome-back notice, or `None` when
/// the absence was too short or nothing would be earned.
pub fn offline_catch_up(state: &mut EconomyState, now: Timestamp) -> Option<u64> {
    let seconds = now.saturating_sub(state.last_save_timestamp) / 1000;
    if seconds <= OFFLINE_MIN_SECONDS {
        return None;
    }
    let earnings = (passive_rate_without_buffs(state) * offline_rate(state) * seconds as f64).floor();
    if earnings <= 0.0 {
        return None;
    }

    state.current_papers += earnings;
    state.total_papers_lifetime += earnings;
    state.last_save_timestamp = now;
    state
        .buffs
        .retain(|b| !matches!(b.kind, BuffKind::FruitSnack | BuffKind::CriticalStudy));

    log::info!("offline for {seconds}s: credited {earnings} papers");
    Some(earnings as u64)
}

pub fn record_antagonist_defeated(state: &mut EconomyState) {
    state.antagonists_defeated += 1;
}

/// Raise the goal watermark. It never goes down.
pub fn update_highest_goal(state: &mut EconomyState, goal_id: u32) {
    state.highest_goal_reached = state.highest_goal_reached.max(goal_id);
}

pub fn mark_victory_seen(state: &mut EconomyState) {
    state.has_seen_victory = true;
}

pub fn mark_intro_seen(state: &mut EconomyState) {
    state.has_seen_intro = true;
}

/// Debug: grant papers as if they were produced.
pub fn add_papers(state: &mut EconomyState, amount: f64) {
    state.current_papers += amount;
    state.total_papers_lifetime += amount;
}

/// Debug: grant splinters as if they were earned.
pub fn add_splinters(state: &mut EconomyState, amount: u64) {
    state.golden_splinters += amount;
    state.total_splinters_earned += amount;
}

/// Forget everything and start over.
pub fn wipe(state: &mut EconomyState, now: Timestamp) {
    *state = EconomyState::new(now);
}
