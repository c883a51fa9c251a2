//! Bee-Kay Academy: write papers, recruit students, graduate for golden
//! splinters and rebuild the Wooden Park.

pub mod actions;
pub mod antagonist;
pub mod formula;
pub mod goals;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use actions::{Action, Tab};
use antagonist::{AntagonistDirector, Encounter, EncounterOutcome};
use formula::format_compact;
use save::AUTOSAVE_INTERVAL;
use state::{prestige_tier, Blueprint, EconomyState, Timestamp, UnitKind, OFFLINE_MIN_SECONDS};

/// Game ticks per economy tick. 10 ticks/sec → one economy second.
pub const ECONOMY_TICK_INTERVAL: u64 = 10;
/// Event log entries kept for display.
const MAX_LOG: usize = 8;
/// Header taps needed to reveal the dev tab, and the window they must land in.
const DEV_UNLOCK_TAPS: usize = 5;
const DEV_UNLOCK_WINDOW_MS: u64 = 3_000;
pub const DEV_PAPERS: f64 = 1_000_000.0;
pub const DEV_SPLINTERS: u64 = 1_000;

pub const INTRO_LINES: [&str; 5] = [
    "Welcome, Architect! I am the Founder of this Academy.",
    "Our beloved Wooden Park has withered into splinters over the years.",
    "I need your academic excellence to bring it back to life.",
    "Write papers, recruit students, and use Golden Splinters to rebuild our legacy.",
    "Rebuild all 5 pieces to reach victory. Let's begin!",
];

/// Whatever currently covers the main screen, highest priority first.
#[derive(Debug, PartialEq)]
pub enum Overlay<'a> {
    Encounter(&'a Encounter),
    WelcomeBack(u64),
    Intro(usize),
    Victory,
}

pub struct AcademyGame {
    pub state: EconomyState,
    pub tab: Tab,
    pub director: AntagonistDirector,
    /// Papers credited while away. Shown until dismissed.
    pub welcome_back: Option<u64>,
    /// Current intro line, while the intro is showing.
    pub intro_step: Option<usize>,
    pub show_victory: bool,
    pub confirm_wipe: bool,
    pub dev_unlocked: bool,
    /// Gain from the most recent click, for the "+N" next to the button.
    pub last_click: Option<f64>,
    pub log: Vec<String>,
    /// Wall time of the last write to storage. `None` after a wipe.
    pub saved_at: Option<Timestamp>,
    header_taps: Vec<Timestamp>,
    ticks: u64,
    /// Wall time the economy was last advanced to.
    last_economy_tick: Timestamp,
}

impl AcademyGame {
    /// Load the saved game (on the web) or start fresh, then pay out
    /// anything earned while the page was closed.
    pub fn new(now: Timestamp, seed: u64) -> Self {
        let state = EconomyState::new(now);

        #[cfg(target_arch = "wasm32")]
        let state = match save::load_game(now) {
            Some(loaded) => {
                log::info!("save loaded");
                loaded
            }
            None => state,
        };

        Self::from_state(state, now, seed)
    }

    pub fn from_state(mut state: EconomyState, now: Timestamp, seed: u64) -> Self {
        let welcome_back = logic::offline_catch_up(&mut state, now);
        let intro_step = if state.has_seen_intro { None } else { Some(0) };
        let mut game = Self {
            state,
            tab: Tab::Shop,
            director: AntagonistDirector::new(seed),
            welcome_back,
            intro_step,
            show_victory: false,
            confirm_wipe: false,
            dev_unlocked: false,
            last_click: None,
            log: Vec::new(),
            saved_at: None,
            header_taps: Vec::new(),
            ticks: 0,
            last_economy_tick: now,
        };
        if let Some(earned) = welcome_back {
            game.note(format!(
                "Welcome back! Your students wrote {} papers",
                format_compact(earned as f64)
            ));
        }
        game.refresh_milestones();
        game
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn overlay(&self) -> Option<Overlay<'_>> {
        if let Some(enc) = &self.director.encounter {
            return Some(Overlay::Encounter(enc));
        }
        if let Some(earned) = self.welcome_back {
            return Some(Overlay::WelcomeBack(earned));
        }
        if let Some(step) = self.intro_step {
            return Some(Overlay::Intro(step));
        }
        if self.show_victory {
            return Some(Overlay::Victory);
        }
        None
    }

    pub fn visible_tabs(&self) -> Vec<Tab> {
        Tab::all()
            .iter()
            .copied()
            .filter(|t| *t != Tab::Dev || self.dev_unlocked)
            .collect()
    }

    fn next_tab(&self) -> Tab {
        let tabs = self.visible_tabs();
        let pos = tabs.iter().position(|t| *t == self.tab).unwrap_or(0);
        tabs[(pos + 1) % tabs.len()]
    }

    fn note(&mut self, msg: impl Into<String>) {
        self.log.push(msg.into());
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Stamp the snapshot time and write it to storage. Any unpaid gap is
    /// credited first, or the new stamp would hide it from the next load.
    pub fn persist(&mut self, now: Timestamp) {
        self.pay_gap(now);
        self.state.last_save_timestamp = now;
        #[cfg(target_arch = "wasm32")]
        save::save_game(&self.state);
        self.saved_at = Some(now);
    }

    /// Credit the time since the last economy tick when frames stopped for
    /// longer than `OFFLINE_MIN_SECONDS` (a hidden tab, a sleeping laptop).
    /// Paid at the offline rate, exactly as if the page had been reloaded.
    fn pay_gap(&mut self, now: Timestamp) {
        let since = self.last_economy_tick;
        if now.saturating_sub(since) / 1000 <= OFFLINE_MIN_SECONDS {
            return;
        }
        self.last_economy_tick = now;

        let stamp = self.state.last_save_timestamp;
        self.state.last_save_timestamp = since;
        match logic::offline_catch_up(&mut self.state, now) {
            Some(earned) => {
                self.welcome_back = Some(self.welcome_back.unwrap_or(0) + earned);
                self.note(format!(
                    "Welcome back! Your students wrote {} papers",
                    format_compact(earned as f64)
                ));
                self.refresh_milestones();
            }
            None => self.state.last_save_timestamp = stamp,
        }
    }

    /// Goal watermark and the one-time victory screen.
    fn refresh_milestones(&mut self) {
        let (completed, _) = goals::goal_progress(&self.state);
        logic::update_highest_goal(&mut self.state, completed as u32);
        if self.state.is_victorious() && !self.state.has_seen_victory && !self.show_victory {
            self.show_victory = true;
            self.note("The Founder Statue stands. The Wooden Park lives again!");
        }
    }

    // ── Input ──────────────────────────────────────────────────

    /// Keyboard shortcut for `key` in the current context.
    pub fn key_action(&self, key: char) -> Option<Action> {
        match self.overlay() {
            Some(Overlay::Encounter(_)) => {
                return match key {
                    's' | ' ' | 'c' => Some(Action::SlideToStudy),
                    _ => None,
                };
            }
            Some(_) => {
                return match key {
                    'q' | '\n' | ' ' => Some(Action::Dismiss),
                    _ => None,
                };
            }
            None => {}
        }

        let global = match key {
            'c' | ' ' => Some(Action::WritePaper),
            '\t' => Some(Action::SelectTab(self.next_tab())),
            'b' => Some(Action::ActivateBoost),
            'a' => Some(Action::BuyAutoBoost),
            't' => Some(Action::ToggleAutoBoost),
            'g' => Some(Action::Graduate),
            '`' => Some(Action::TapHeader),
            _ => None,
        };
        if global.is_some() {
            return global;
        }

        let index = key.to_digit(10).map(|d| d as usize);
        match self.tab {
            Tab::Shop => UnitKind::all()
                .get(index?.checked_sub(1)?)
                .map(|u| Action::BuyUnit(*u)),
            Tab::Park => Blueprint::all()
                .get(index?.checked_sub(1)?)
                .map(|b| Action::BuyBlueprint(*b)),
            Tab::Graduation => {
                let tier = index? as u8;
                prestige_tier(tier).map(|def| Action::BuyPrestigeTier(def.tier))
            }
            Tab::Trophies => None,
            Tab::Dev => match key {
                'p' => Some(Action::DevAddPapers),
                'k' => Some(Action::DevAddSplinters),
                'w' => Some(Action::RequestWipe),
                'y' => Some(Action::ConfirmWipe),
                _ => None,
            },
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent, now: Timestamp) -> bool {
        let action = match event {
            InputEvent::Key(c) => self.key_action(*c),
            InputEvent::Click(id) => Action::from_id(*id),
        };
        let consumed = match action {
            Some(action) => self.dispatch(action, now),
            None => false,
        };
        // A wipe already cleared storage; saving now would write the blank
        // game straight back.
        if consumed && action != Some(Action::ConfirmWipe) {
            self.persist(now);
        }
        consumed
    }

    /// Apply one player action. Returns true if it changed anything.
    pub fn dispatch(&mut self, action: Action, now: Timestamp) -> bool {
        // Notices are modal: only their own controls work underneath.
        match self.overlay() {
            Some(Overlay::Encounter(_)) => {
                return match action {
                    Action::SlideToStudy => self.slide(now),
                    _ => false,
                };
            }
            Some(_) => {
                return match action {
                    Action::Dismiss => self.dismiss(),
                    _ => false,
                };
            }
            None => {}
        }

        if !matches!(action, Action::RequestWipe | Action::ConfirmWipe) {
            self.confirm_wipe = false;
        }

        let changed = match action {
            Action::WritePaper => {
                self.last_click = Some(logic::click(&mut self.state, now));
                true
            }
            Action::SlideToStudy | Action::Dismiss => false,
            Action::TapHeader => self.tap_header(now),
            Action::SelectTab(tab) => {
                if tab == Tab::Dev && !self.dev_unlocked {
                    return false;
                }
                self.tab = tab;
                true
            }
            Action::BuyUnit(unit) => {
                let ok = logic::buy_unit(&mut self.state, unit);
                if ok {
                    self.note(format!(
                        "Recruited a {} ({} total)",
                        unit.name(),
                        self.state.owned(unit)
                    ));
                }
                ok
            }
            Action::ActivateBoost => {
                let ok = logic::activate_boost(&mut self.state, now);
                if ok {
                    self.note("Fruit snacks handed out: production x2 for 30s");
                }
                ok
            }
            Action::BuyAutoBoost => {
                let ok = logic::purchase_auto_boost(&mut self.state);
                if ok {
                    self.note("Snack Dispenser installed: fruit snacks refill automatically");
                }
                ok
            }
            Action::ToggleAutoBoost => {
                if !self.state.auto_boost_purchased {
                    return false;
                }
                logic::toggle_auto_boost(&mut self.state);
                true
            }
            Action::BuyBlueprint(bp) => {
                let ok = logic::buy_blueprint(&mut self.state, bp);
                if ok {
                    self.note(format!("Rebuilt {}: {}", bp.name(), bp.effect()));
                }
                ok
            }
            Action::Graduate => {
                let gain = logic::graduate(&mut self.state, now);
                if gain > 0 {
                    self.last_click = None;
                    self.note(format!("Graduated! +{gain} Golden Splinters"));
                }
                gain > 0
            }
            Action::BuyPrestigeTier(tier) => {
                let ok = logic::purchase_prestige_tier(&mut self.state, tier);
                if let (true, Some(def)) = (ok, prestige_tier(tier)) {
                    self.note(format!("Reached {}: {}", def.name, def.effect));
                }
                ok
            }
            Action::DevAddPapers | Action::DevAddSplinters if !self.dev_unlocked => false,
            Action::DevAddPapers => {
                logic::add_papers(&mut self.state, DEV_PAPERS);
                true
            }
            Action::DevAddSplinters => {
                logic::add_splinters(&mut self.state, DEV_SPLINTERS);
                true
            }
            Action::RequestWipe => {
                if !self.dev_unlocked {
                    return false;
                }
                self.confirm_wipe = true;
                true
            }
            Action::ConfirmWipe => {
                if !self.confirm_wipe {
                    return false;
                }
                self.wipe(now);
                true
            }
        };

        if changed {
            self.refresh_milestones();
        }
        changed
    }

    fn slide(&mut self, now: Timestamp) -> bool {
        match self.director.slide(&mut self.state, now) {
            EncounterOutcome::Pending => {}
            EncounterOutcome::Defeated { critical } => {
                self.note("Slid to study! The interruption is over");
                if critical {
                    self.note("CRITICAL STUDY! Everything x5 for 10s");
                }
            }
            EncounterOutcome::Failed(kind) => self.note_failure(kind),
        }
        true
    }

    fn note_failure(&mut self, kind: state::AntagonistKind) {
        self.note(format!("{} got through. {}", kind.title(), kind.penalty()));
    }

    fn dismiss(&mut self) -> bool {
        if self.welcome_back.take().is_some() {
            return true;
        }
        if let Some(step) = self.intro_step {
            if step + 1 < INTRO_LINES.len() {
                self.intro_step = Some(step + 1);
            } else {
                self.intro_step = None;
                logic::mark_intro_seen(&mut self.state);
            }
            return true;
        }
        if self.show_victory {
            self.show_victory = false;
            logic::mark_victory_seen(&mut self.state);
            return true;
        }
        false
    }

    fn tap_header(&mut self, now: Timestamp) -> bool {
        if self.dev_unlocked {
            return false;
        }
        self.header_taps
            .retain(|t| now.saturating_sub(*t) < DEV_UNLOCK_WINDOW_MS);
        self.header_taps.push(now);
        if self.header_taps.len() < DEV_UNLOCK_TAPS {
            return false;
        }
        self.header_taps.clear();
        self.dev_unlocked = true;
        self.tab = Tab::Dev;
        log::info!("dev tab unlocked");
        true
    }

    fn wipe(&mut self, now: Timestamp) {
        logic::wipe(&mut self.state, now);
        #[cfg(target_arch = "wasm32")]
        save::delete_save();
        log::info!("save wiped");

        self.director.encounter = None;
        self.welcome_back = None;
        self.intro_step = Some(0);
        self.show_victory = false;
        self.confirm_wipe = false;
        self.last_click = None;
        self.tab = Tab::Shop;
        self.log.clear();
        self.saved_at = None;
        self.last_economy_tick = now;
    }

    // ── Time ───────────────────────────────────────────────────

    /// Advance by `delta_ticks` game ticks, all observed at wall time `now`.
    /// The frame clock caps long gaps, so wall time missed beyond that is
    /// paid out here before anything can autosave over it.
    pub fn tick(&mut self, delta_ticks: u32, now: Timestamp) {
        self.pay_gap(now);
        for _ in 0..delta_ticks {
            self.ticks += 1;

            if let EncounterOutcome::Failed(kind) = self.director.update(&mut self.state, now) {
                self.note_failure(kind);
            }

            if self.ticks % ECONOMY_TICK_INTERVAL == 0 {
                logic::tick(&mut self.state, now);
                self.last_economy_tick = now;
                self.refresh_milestones();
            }

            // No interruptions while a notice is being read.
            if self.overlay().is_none() {
                if let Some(kind) = self.director.maybe_spawn(&self.state, now) {
                    self.note(format!("{} appears! Slide to study!", kind.title()));
                }
            }

            if self.ticks % AUTOSAVE_INTERVAL == 0 {
                self.persist(now);
            }
        }
    }

    pub fn render(
        &self,
        now: Timestamp,
        f: &mut Frame,
        area: Rect,
        click_state: &Rc<RefCell<ClickState>>,
    ) {
        render::render(self, now, f, area, click_state);
    }
}
