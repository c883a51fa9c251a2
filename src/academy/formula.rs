//! Pure numeric curves shared by the economy and the UI.

/// Growth factor applied to a unit's price for every copy already owned.
pub const COST_GROWTH: f64 = 1.15;

/// Lifetime papers that correspond to the first 10 splinters.
const SPLINTER_SCALE: f64 = 2500.0;

/// Production and click bonus granted per golden splinter held.
const SPLINTER_BONUS: f64 = 0.05;

/// Price of the next unit when `owned` copies are already on the roster.
pub fn unit_cost(base: f64, owned: u32) -> f64 {
    (base * COST_GROWTH.powi(owned as i32)).floor()
}

/// Total splinters a graduation would leave the player holding.
pub fn splinters_for(lifetime_papers: f64) -> u64 {
    if lifetime_papers <= 0.0 {
        return 0;
    }
    (10.0 * (lifetime_papers / SPLINTER_SCALE).sqrt()).floor() as u64
}

/// Global multiplier from held splinters. Uncapped.
pub fn splinter_multiplier(splinters: u64) -> f64 {
    1.0 + splinters as f64 * SPLINTER_BONUS
}

/// Lifetime papers needed before a graduation yields `splinters + 1`.
pub fn papers_for_next_splinter(splinters: u64) -> f64 {
    SPLINTER_SCALE * ((splinters as f64 + 1.0) / 10.0).powi(2)
}

/// Abbreviated display form: `999`, `1.2k`, `3.4M`, `5.0B`, `6.7T`.
///
/// The decimal is truncated, not rounded, so a value never displays larger
/// than it is.
pub fn format_compact(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_compact(-n));
    }
    const SUFFIXES: [(f64, &str); 4] = [(1e3, "k"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

    if n < 1e3 {
        return format!("{}", n.floor() as u64);
    }
    let (scale, suffix) = SUFFIXES
        .iter()
        .rev()
        .find(|(scale, _)| n >= *scale)
        .copied()
        .unwrap_or(SUFFIXES[0]);
    let tenths = (n / (scale / 10.0)).floor();
    format!("{:.1}{}", tenths / 10.0, suffix)
}
