//! Goal progression and trophy milestones, evaluated from a state snapshot.

use super::state::{Blueprint, EconomyState, UnitKind};

/// One step of the guided progression.
pub struct Goal {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    /// Teaser shown for the step after this one.
    pub next_hint: &'static str,
    is_complete: fn(&EconomyState) -> bool,
}

impl Goal {
    pub fn is_complete(&self, state: &EconomyState) -> bool {
        (self.is_complete)(state)
    }
}

pub static GOALS: [Goal; 9] = [
    Goal {
        id: 1,
        title: "Start Writing",
        description: "Reach 15 Papers",
        next_hint: "Recruit help",
        is_complete: |s| s.total_papers_lifetime >= 15.0,
    },
    Goal {
        id: 2,
        title: "Recruitment",
        description: "Open the shop and buy 1 Daydreamer",
        next_hint: "Stock up",
        is_complete: |s| s.owned(UnitKind::Daydreamer) >= 1,
    },
    Goal {
        id: 3,
        title: "Boost Power",
        description: "Reach 50 Papers",
        next_hint: "Earn Degree",
        is_complete: |s| s.current_papers >= 50.0,
    },
    Goal {
        id: 4,
        title: "Graduate",
        description: "Graduate to earn Golden Splinters",
        next_hint: "Fix the Steps",
        is_complete: |s| s.total_splinters_earned > 0,
    },
    Goal {
        id: 5,
        title: "Architect Phase 1",
        description: "Buy 'The Steps' blueprint",
        next_hint: "Fix the Slide",
        is_complete: |s| s.has_blueprint(Blueprint::Steps),
    },
    Goal {
        id: 6,
        title: "Architect Phase 2",
        description: "Buy 'The Cedar Slide' blueprint",
        next_hint: "Fix the Swings",
        is_complete: |s| s.has_blueprint(Blueprint::Slide),
    },
    Goal {
        id: 7,
        title: "Architect Phase 3",
        description: "Buy 'The Swings' blueprint",
        next_hint: "Fix the Walls",
        is_complete: |s| s.has_blueprint(Blueprint::Swing),
    },
    Goal {
        id: 8,
        title: "Architect Phase 4",
        description: "Buy 'The Walls' blueprint",
        next_hint: "The Founder",
        is_complete: |s| s.has_blueprint(Blueprint::Walls),
    },
    Goal {
        id: 9,
        title: "Final Victory",
        description: "Buy 'The Founder Statue' to win",
        next_hint: "Victory!",
        is_complete: |s| s.has_blueprint(Blueprint::Statue),
    },
];

/// Goals completed so far. Everything up to `highest_goal_reached` stays
/// done even if its predicate no longer holds (papers spent, a graduation);
/// from there, satisfied goals are counted in table order.
pub fn completed_goals(state: &EconomyState) -> usize {
    let reached = (state.highest_goal_reached as usize).min(GOALS.len());
    reached
        + GOALS[reached..]
            .iter()
            .take_while(|g| g.is_complete(state))
            .count()
}

/// The goal being worked on, or `None` once everything is done.
///
/// Goals are checked in table order, so a later goal that happens to be
/// satisfied does not skip an earlier unsatisfied one.
pub fn current_goal(state: &EconomyState) -> Option<&'static Goal> {
    GOALS.get(completed_goals(state))
}

/// The goal after the current one.
pub fn next_goal(state: &EconomyState) -> Option<&'static Goal> {
    GOALS.get(completed_goals(state) + 1)
}

/// `(completed, total)`.
pub fn goal_progress(state: &EconomyState) -> (usize, usize) {
    (completed_goals(state), GOALS.len())
}

// ── Trophies ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trophy {
    SplinterCollector,
    PaperTrail,
    AcademyArchitect,
    GreatDefender,
    FoundersLegacy,
}

impl Trophy {
    pub fn all() -> &'static [Trophy] {
        &[
            Trophy::SplinterCollector,
            Trophy::PaperTrail,
            Trophy::AcademyArchitect,
            Trophy::GreatDefender,
            Trophy::FoundersLegacy,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Trophy::SplinterCollector => "Splinter Collector",
            Trophy::PaperTrail => "Paper Trail",
            Trophy::AcademyArchitect => "Academy Architect",
            Trophy::GreatDefender => "The Great Defender",
            Trophy::FoundersLegacy => "Founder's Legacy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Trophy::SplinterCollector => "Reach 1,000 total Splinters earned",
            Trophy::PaperTrail => "Reach 100,000 Papers this cycle",
            Trophy::AcademyArchitect => "Unlock the first 3 Blueprint pieces",
            Trophy::GreatDefender => "Slide to Study past 25 antagonists",
            Trophy::FoundersLegacy => "Complete the Founder Statue",
        }
    }

    fn target(&self) -> f64 {
        match self {
            Trophy::SplinterCollector => 1_000.0,
            Trophy::PaperTrail => 100_000.0,
            Trophy::AcademyArchitect => 3.0,
            Trophy::GreatDefender => 25.0,
            Trophy::FoundersLegacy => 1.0,
        }
    }

    fn measure(&self, state: &EconomyState) -> f64 {
        match self {
            Trophy::SplinterCollector => state.total_splinters_earned as f64,
            Trophy::PaperTrail => state.total_papers_lifetime,
            Trophy::AcademyArchitect => state.unlocked_blueprints.len() as f64,
            Trophy::GreatDefender => state.antagonists_defeated as f64,
            Trophy::FoundersLegacy => {
                if state.is_victorious() {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// `(current, target)`, with current clamped to the target.
    pub fn progress(&self, state: &EconomyState) -> (f64, f64) {
        let target = self.target();
        (self.measure(state).min(target), target)
    }

    pub fn is_complete(&self, state: &EconomyState) -> bool {
        self.measure(state) >= self.target()
    }
}

/// Number of trophies earned.
pub fn trophies_earned(state: &EconomyState) -> usize {
    Trophy::all().iter().filter(|t| t.is_complete(state)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academy::logic;

    fn fresh() -> EconomyState {
        EconomyState::new(0)
    }

    #[test]
    fn fresh_state_starts_at_goal_one() {
        let s = fresh();
        assert_eq!(current_goal(&s).map(|g| g.id), Some(1));
        assert_eq!(next_goal(&s).map(|g| g.id), Some(2));
        assert_eq!(goal_progress(&s), (0, 9));
    }

    #[test]
    fn fifteen_clicks_complete_start_writing() {
        let mut s = fresh();
        for _ in 0..15 {
            logic::click(&mut s, 0);
        }
        assert!(GOALS[0].is_complete(&s));
        assert_eq!(current_goal(&s).map(|g| g.title), Some("Recruitment"));
    }

    #[test]
    fn ids_are_sequential() {
        for (i, g) in GOALS.iter().enumerate() {
            assert_eq!(g.id as usize, i + 1);
        }
    }

    #[test]
    fn earlier_unsatisfied_goal_blocks_later_ones() {
        let mut s = fresh();
        s.total_papers_lifetime = 100.0;
        s.current_papers = 100.0; // goal 3 satisfied, goal 2 not
        assert_eq!(current_goal(&s).map(|g| g.id), Some(2));
        assert_eq!(goal_progress(&s), (1, 9));
    }

    #[test]
    fn reached_goal_stays_done_after_spending() {
        let mut s = fresh();
        s.total_papers_lifetime = 100.0;
        s.current_papers = 60.0;
        s.units.insert(UnitKind::Daydreamer, 1);
        assert_eq!(current_goal(&s).map(|g| g.id), Some(4));
        let reached = goal_progress(&s).0 as u32;
        logic::update_highest_goal(&mut s, reached);

        s.current_papers = 10.0;
        assert_eq!(current_goal(&s).map(|g| g.id), Some(4));
        assert_eq!(goal_progress(&s), (3, 9));
    }

    #[test]
    fn graduating_keeps_goal_progress() {
        let mut s = fresh();
        s.units.insert(UnitKind::Daydreamer, 1);
        s.current_papers = 100.0;
        s.total_papers_lifetime = 2_500.0;
        s.total_splinters_earned = 200;
        s.golden_splinters = 200;
        s.unlocked_blueprints = vec![Blueprint::Steps];
        assert_eq!(current_goal(&s).map(|g| g.id), Some(6));
        let reached = goal_progress(&s).0 as u32;
        logic::update_highest_goal(&mut s, reached);

        s.golden_splinters = 0;
        s.total_papers_lifetime = 1e6;
        assert!(logic::graduate(&mut s, 0) > 0);
        assert_eq!(s.owned(UnitKind::Daydreamer), 0);
        assert_eq!(current_goal(&s).map(|g| g.id), Some(6));
        assert_eq!(next_goal(&s).map(|g| g.id), Some(7));
        assert_eq!(goal_progress(&s), (5, 9));
    }

    #[test]
    fn progress_continues_past_the_watermark() {
        let mut s = fresh();
        s.highest_goal_reached = 2;
        s.current_papers = 50.0;
        // Goal 3 holds now; goals 1 and 2 ride on the watermark.
        assert_eq!(goal_progress(&s), (3, 9));
        assert_eq!(current_goal(&s).map(|g| g.id), Some(4));
    }

    #[test]
    fn watermark_beyond_table_is_clamped() {
        let mut s = fresh();
        s.highest_goal_reached = 40;
        assert_eq!(goal_progress(&s), (9, 9));
        assert!(current_goal(&s).is_none());
    }

    #[test]
    fn all_blueprints_complete_every_goal() {
        let mut s = fresh();
        s.total_papers_lifetime = 1e6;
        s.current_papers = 1e6;
        s.units.insert(UnitKind::Daydreamer, 1);
        s.total_splinters_earned = 10_000;
        s.unlocked_blueprints = Blueprint::all().to_vec();
        assert!(current_goal(&s).is_none());
        assert!(next_goal(&s).is_none());
        assert_eq!(goal_progress(&s), (9, 9));
    }

    #[test]
    fn last_goal_has_no_next() {
        let mut s = fresh();
        s.total_papers_lifetime = 1e6;
        s.current_papers = 1e6;
        s.units.insert(UnitKind::Daydreamer, 1);
        s.total_splinters_earned = 1;
        s.unlocked_blueprints = vec![
            Blueprint::Steps,
            Blueprint::Slide,
            Blueprint::Swing,
            Blueprint::Walls,
        ];
        assert_eq!(current_goal(&s).map(|g| g.id), Some(9));
        assert!(next_goal(&s).is_none());
    }

    #[test]
    fn trophy_progress_is_clamped() {
        let mut s = fresh();
        s.antagonists_defeated = 40;
        assert_eq!(Trophy::GreatDefender.progress(&s), (25.0, 25.0));
        assert!(Trophy::GreatDefender.is_complete(&s));
        s.antagonists_defeated = 7;
        assert_eq!(Trophy::GreatDefender.progress(&s), (7.0, 25.0));
        assert!(!Trophy::GreatDefender.is_complete(&s));
    }

    #[test]
    fn trophies_count() {
        let mut s = fresh();
        assert_eq!(trophies_earned(&s), 0);
        s.total_splinters_earned = 1_000;
        s.unlocked_blueprints = Blueprint::all().to_vec();
        // Collector, Architect, Legacy
        assert_eq!(trophies_earned(&s), 3);
    }
}
