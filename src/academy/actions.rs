//! Player actions and their click-target IDs.
//!
//! Render registers `Action::id()` for every clickable row; the controller
//! turns the ID back into an `Action` with `Action::from_id` and dispatches it.

use super::state::{Blueprint, UnitKind, MAX_PRESTIGE_TIER};

// ── Core ─────────────────────────────────────────────────────────
pub const WRITE_PAPER: u16 = 0;
pub const SLIDE_TO_STUDY: u16 = 1;
pub const DISMISS: u16 = 2;
pub const TAP_HEADER: u16 = 3;

// ── Tabs (base + Tab index) ──────────────────────────────────────
pub const TAB_BASE: u16 = 10;

// ── Shop ─────────────────────────────────────────────────────────
pub const BUY_UNIT_BASE: u16 = 100; // + UnitKind::all() index
pub const ACTIVATE_BOOST: u16 = 150;
pub const BUY_AUTO_BOOST: u16 = 151;
pub const TOGGLE_AUTO_BOOST: u16 = 152;

// ── Park ─────────────────────────────────────────────────────────
pub const BUY_BLUEPRINT_BASE: u16 = 200; // + Blueprint::all() index

// ── Graduation ───────────────────────────────────────────────────
pub const GRADUATE: u16 = 300;
pub const BUY_TIER_BASE: u16 = 310; // + tier number

// ── Dev ──────────────────────────────────────────────────────────
pub const DEV_ADD_PAPERS: u16 = 900;
pub const DEV_ADD_SPLINTERS: u16 = 901;
pub const REQUEST_WIPE: u16 = 910;
pub const CONFIRM_WIPE: u16 = 911;

/// Screens below the paper counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Shop,
    Graduation,
    Park,
    Trophies,
    Dev,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Shop, Tab::Graduation, Tab::Park, Tab::Trophies, Tab::Dev]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Shop => "Shop",
            Tab::Graduation => "Graduate",
            Tab::Park => "Park",
            Tab::Trophies => "Trophies",
            Tab::Dev => "Dev",
        }
    }

    fn index(&self) -> usize {
        Tab::all().iter().position(|t| t == self).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    WritePaper,
    SlideToStudy,
    /// Close whichever notice is on top.
    Dismiss,
    /// Tap on the title bar. Five quick taps reveal the dev tab.
    TapHeader,
    SelectTab(Tab),
    BuyUnit(UnitKind),
    ActivateBoost,
    BuyAutoBoost,
    ToggleAutoBoost,
    BuyBlueprint(Blueprint),
    Graduate,
    BuyPrestigeTier(u8),
    DevAddPapers,
    DevAddSplinters,
    RequestWipe,
    ConfirmWipe,
}

impl Action {
    pub fn id(&self) -> u16 {
        let index_of = |pos: Option<usize>| pos.unwrap_or(0) as u16;
        match *self {
            Action::WritePaper => WRITE_PAPER,
            Action::SlideToStudy => SLIDE_TO_STUDY,
            Action::Dismiss => DISMISS,
            Action::TapHeader => TAP_HEADER,
            Action::SelectTab(tab) => TAB_BASE + tab.index() as u16,
            Action::BuyUnit(unit) => {
                BUY_UNIT_BASE + index_of(UnitKind::all().iter().position(|u| *u == unit))
            }
            Action::ActivateBoost => ACTIVATE_BOOST,
            Action::BuyAutoBoost => BUY_AUTO_BOOST,
            Action::ToggleAutoBoost => TOGGLE_AUTO_BOOST,
            Action::BuyBlueprint(bp) => {
                BUY_BLUEPRINT_BASE + index_of(Blueprint::all().iter().position(|b| *b == bp))
            }
            Action::Graduate => GRADUATE,
            Action::BuyPrestigeTier(tier) => BUY_TIER_BASE + tier as u16,
            Action::DevAddPapers => DEV_ADD_PAPERS,
            Action::DevAddSplinters => DEV_ADD_SPLINTERS,
            Action::RequestWipe => REQUEST_WIPE,
            Action::ConfirmWipe => CONFIRM_WIPE,
        }
    }

    pub fn from_id(id: u16) -> Option<Action> {
        let action = match id {
            WRITE_PAPER => Action::WritePaper,
            SLIDE_TO_STUDY => Action::SlideToStudy,
            DISMISS => Action::Dismiss,
            TAP_HEADER => Action::TapHeader,
            ACTIVATE_BOOST => Action::ActivateBoost,
            BUY_AUTO_BOOST => Action::BuyAutoBoost,
            TOGGLE_AUTO_BOOST => Action::ToggleAutoBoost,
            GRADUATE => Action::Graduate,
            DEV_ADD_PAPERS => Action::DevAddPapers,
            DEV_ADD_SPLINTERS => Action::DevAddSplinters,
            REQUEST_WIPE => Action::RequestWipe,
            CONFIRM_WIPE => Action::ConfirmWipe,
            id if (TAB_BASE..TAB_BASE + 10).contains(&id) => {
                Action::SelectTab(*Tab::all().get((id - TAB_BASE) as usize)?)
            }
            id if (BUY_UNIT_BASE..ACTIVATE_BOOST).contains(&id) => {
                Action::BuyUnit(*UnitKind::all().get((id - BUY_UNIT_BASE) as usize)?)
            }
            id if (BUY_BLUEPRINT_BASE..GRADUATE).contains(&id) => {
                Action::BuyBlueprint(*Blueprint::all().get((id - BUY_BLUEPRINT_BASE) as usize)?)
            }
            id if (BUY_TIER_BASE + 1..=BUY_TIER_BASE + MAX_PRESTIGE_TIER as u16).contains(&id) => {
                Action::BuyPrestigeTier((id - BUY_TIER_BASE) as u8)
            }
            _ => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_action() -> Vec<Action> {
        let mut all = vec![
            Action::WritePaper,
            Action::SlideToStudy,
            Action::Dismiss,
            Action::TapHeader,
            Action::ActivateBoost,
            Action::BuyAutoBoost,
            Action::ToggleAutoBoost,
            Action::Graduate,
            Action::DevAddPapers,
            Action::DevAddSplinters,
            Action::RequestWipe,
            Action::ConfirmWipe,
        ];
        all.extend(Tab::all().iter().map(|t| Action::SelectTab(*t)));
        all.extend(UnitKind::all().iter().map(|u| Action::BuyUnit(*u)));
        all.extend(Blueprint::all().iter().map(|b| Action::BuyBlueprint(*b)));
        all.extend((1..=MAX_PRESTIGE_TIER).map(Action::BuyPrestigeTier));
        all
    }

    #[test]
    fn ids_map_back_to_actions() {
        for action in every_action() {
            assert_eq!(Action::from_id(action.id()), Some(action), "{action:?}");
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<u16> = every_action().iter().map(|a| a.id()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn unknown_ids_are_none() {
        assert_eq!(Action::from_id(TAB_BASE + 9), None);
        assert_eq!(Action::from_id(BUY_UNIT_BASE + 20), None);
        assert_eq!(Action::from_id(BUY_TIER_BASE), None);
        assert_eq!(Action::from_id(BUY_TIER_BASE + 4), None);
        assert_eq!(Action::from_id(5_000), None);
    }
}
