//! Bee-Kay Academy rendering (read-only from the controller).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::antagonist::Encounter;
use super::formula::{format_compact, papers_for_next_splinter, splinter_multiplier};
use super::goals::{current_goal, goal_progress, next_goal, Trophy};
use super::logic::{click_power, passive_income, pending_splinter_gain, unit_price};
use super::state::{
    Blueprint, BuffKind, EconomyState, Timestamp, UnitKind, AUTO_BOOST_COST, FRUIT_SNACK_COST,
    PRESTIGE_TIERS,
};
use super::{AcademyGame, Overlay, INTRO_LINES};

const NEWS: [&str; 8] = [
    "RUMOR: The old Cedar Slide didn't just have speed; it had soul.",
    "Principal announces 'No Running' on the new playground. Students respond by walking very fast.",
    "Chef Soggy spotted buying 'Mystery Cans' with no labels again.",
    "LOCAL NEWS: Gaga Ball declared a 'High-Intensity Sport' by the 7th grade council.",
    "A mechanical pencil was found with 4B lead. The owner is being hailed as a hero.",
    "The Modern Playground has been seen 'watching' the students during recess...",
    "Warning: The Mystery Meatloaf has achieved sentience. Do not make eye contact.",
    "The Wooden Park pieces are scattered... find them all.",
];
/// Game ticks each headline stays up.
const NEWS_TICKS: u64 = 80;

pub fn render(
    game: &AcademyGame,
    now: Timestamp,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let is_narrow = is_narrow_layout(area.width);
    let borders = borders_for(area.width);

    let status_height = if is_narrow { 13 } else { 9 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(status_height), // Papers + goal
            Constraint::Length(3),             // Tabs
            Constraint::Min(7),                // Tab content
            Constraint::Length(if is_narrow { 4 } else { 5 }), // Log
            Constraint::Length(1),             // News ticker
        ])
        .split(area);

    render_header(&game.state, f, chunks[0], borders, click_state);

    if is_narrow {
        let status = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(4)])
            .split(chunks[1]);
        render_papers(&game.state, game.last_click, now, f, status[0], borders, click_state);
        render_goal(&game.state, f, status[1], borders);
    } else {
        let status = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        render_papers(&game.state, game.last_click, now, f, status[0], borders, click_state);
        render_goal(&game.state, f, status[1], borders);
    }

    render_tabs(game, f, chunks[2], borders, click_state);

    match game.tab {
        Tab::Shop => render_shop(&game.state, now, f, chunks[3], borders, is_narrow, click_state),
        Tab::Graduation => render_graduation(&game.state, f, chunks[3], borders, click_state),
        Tab::Park => render_park(&game.state, f, chunks[3], borders, is_narrow, click_state),
        Tab::Trophies => render_trophies(&game.state, f, chunks[3], borders, is_narrow),
        Tab::Dev => render_dev(game, f, chunks[3], borders, click_state),
    }

    render_log(game, f, chunks[4], borders);
    render_ticker(game, f, chunks[5]);

    if let Some(overlay) = game.overlay() {
        render_overlay(&overlay, now, f, area, click_state);
    }
}

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    }
}

// ── Header ─────────────────────────────────────────────────────

fn render_header(
    state: &EconomyState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let line = Line::from(vec![
        Span::styled(" ✦ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} Golden Splinters", format_compact(state.golden_splinters as f64)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  (x{:.2} multiplier)", splinter_multiplier(state.golden_splinters)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Bee-Kay Academy ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(line).block(block), area);

    // The whole header is a hidden button.
    click_state.borrow_mut().add_click_target(area, TAP_HEADER);
}

// ── Papers panel ───────────────────────────────────────────────

fn render_papers(
    state: &EconomyState,
    last_click: Option<f64>,
    now: Timestamp,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let power = click_power(state, now);

    let mut counter = vec![
        Span::styled(" Papers: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format_compact(state.current_papers),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  (+{}/s)", format_compact(passive_income(state, now))),
            Style::default().fg(Color::Green),
        ),
    ];
    if let Some(gain) = last_click {
        counter.push(Span::styled(
            format!("  +{}", format_compact(gain)),
            Style::default().fg(Color::Yellow),
        ));
    }
    cl.push(Line::from(counter));
    push_hint(
        &mut cl,
        'C',
        format!("Write a paper  +{}", format_compact(power)),
        WRITE_PAPER,
        true,
    );

    let snack_on = state.buff_active(BuffKind::FruitSnack, now);
    push_hint(
        &mut cl,
        'B',
        format!("Fruit Snack ({} papers): x2 for 30s", FRUIT_SNACK_COST),
        ACTIVATE_BOOST,
        !snack_on && state.current_papers >= FRUIT_SNACK_COST,
    );

    if !state.auto_boost_purchased {
        push_hint(
            &mut cl,
            'A',
            format!("Snack Dispenser ({} papers)", format_compact(AUTO_BOOST_COST)),
            BUY_AUTO_BOOST,
            state.current_papers >= AUTO_BOOST_COST,
        );
    } else {
        let label = if state.auto_boost_enabled {
            "Auto snacks: ON"
        } else {
            "Auto snacks: OFF"
        };
        push_hint(&mut cl, 'T', label.to_string(), TOGGLE_AUTO_BOOST, true);
    }

    for buff in state.buffs.iter().filter(|b| now < b.expires_at) {
        let color = match buff.kind {
            BuffKind::FruitSnack => Color::Green,
            BuffKind::CriticalStudy => Color::Magenta,
            BuffKind::ProductionHalt => Color::Red,
        };
        let secs = state.buff_remaining_ms(buff.kind, now).div_ceil(1_000);
        cl.push(Line::from(Span::styled(
            format!(" ● {} ({}s)", buff.kind.label(), secs),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::White))
        .title(" Study Hall ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &block, &mut cs, false);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Goal panel ─────────────────────────────────────────────────

fn render_goal(state: &EconomyState, f: &mut Frame, area: Rect, borders: Borders) {
    let (done, total) = goal_progress(state);
    let bar_width = area.width.saturating_sub(12).min(24) as usize;

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", progress_bar(done as f64, total as f64, bar_width)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{}/{}", done, total), Style::default().fg(Color::White)),
    ])];

    match current_goal(state) {
        Some(goal) => {
            lines.push(Line::from(Span::styled(
                format!(" {}", goal.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!(" {}", goal.description),
                Style::default().fg(Color::White),
            )));
            if let Some(hint) = next_preview(state) {
                lines.push(Line::from(Span::styled(
                    format!(" Next: {}", hint),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                " All goals complete!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Goal ");
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Teaser for the goal after the current one. Nothing on the last goal.
fn next_preview(state: &EconomyState) -> Option<&'static str> {
    next_goal(state).map(|g| g.next_hint)
}

// ── Tabs ───────────────────────────────────────────────────────

fn render_tabs(
    game: &AcademyGame,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut bar = TabBar::new(" │ ");
    for tab in game.visible_tabs() {
        let style = if tab == game.tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        bar = bar.tab(tab.label(), style, Action::SelectTab(tab).id());
    }
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" [Tab] ", Style::default().fg(Color::DarkGray)));

    let mut cs = click_state.borrow_mut();
    bar.block(block).render(f, area, &mut cs);
}

// ── Shop ───────────────────────────────────────────────────────

fn render_shop(
    state: &EconomyState,
    now: Timestamp,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    is_narrow: bool,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let mult = if passive_income(state, now) > 0.0 {
        passive_income(state, now) / state.base_production()
    } else {
        1.0
    };

    for (i, unit) in UnitKind::all().iter().enumerate() {
        let price = unit_price(state, *unit);
        let affordable = state.current_papers >= price;
        let owned = state.owned(*unit);
        let label = if is_narrow {
            format!("{} x{}  {}", unit.name(), owned, format_compact(price))
        } else {
            format!(
                "{:<15} x{:<4} {:>7}  +{}/s each",
                unit.name(),
                owned,
                format_compact(price),
                format_compact(unit.base_yield() * mult)
            )
        };
        push_hint(
            &mut cl,
            char::from(b'1' + i as u8),
            label,
            Action::BuyUnit(*unit).id(),
            affordable,
        );
        if !is_narrow {
            cl.push(Line::from(Span::styled(
                format!("       {}", unit.description()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Green))
        .title(" Recruit Students ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &block, &mut cs, false);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Graduation ─────────────────────────────────────────────────

fn render_graduation(
    state: &EconomyState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let gain = pending_splinter_gain(state);

    cl.push(Line::from(vec![
        Span::styled(" Lifetime papers: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format_compact(state.total_papers_lifetime),
            Style::default().fg(Color::White),
        ),
    ]));
    if gain > 0 {
        cl.push(Line::from(Span::styled(
            format!(" Graduating now earns +{} Golden Splinters", gain),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        cl.push(Line::from(Span::styled(
            format!(
                " Next splinter at {} lifetime papers",
                format_compact(papers_for_next_splinter(state.golden_splinters))
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }
    push_hint(
        &mut cl,
        'G',
        "Graduate (resets papers and students)".to_string(),
        GRADUATE,
        gain > 0,
    );

    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        " Prestige tiers",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )));
    for tier in PRESTIGE_TIERS.iter() {
        let owned = state.prestige_tier >= tier.tier;
        let label = if owned {
            format!("{} ✓  {}", tier.name, tier.effect)
        } else {
            format!("{} ({} ✦)  {}", tier.name, tier.cost, tier.effect)
        };
        let available = state.prestige_tier + 1 == tier.tier && state.golden_splinters >= tier.cost;
        push_hint(
            &mut cl,
            char::from(b'0' + tier.tier),
            label,
            Action::BuyPrestigeTier(tier.tier).id(),
            available,
        );
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Graduation ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &block, &mut cs, false);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Park ───────────────────────────────────────────────────────

fn render_park(
    state: &EconomyState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    is_narrow: bool,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();

    for (i, bp) in Blueprint::all().iter().enumerate() {
        let owned = state.has_blueprint(*bp);
        let cost = if owned {
            "✓".to_string()
        } else {
            format!("{} ✦", bp.cost())
        };
        let label = if is_narrow {
            format!("{}  {}", bp.name(), cost)
        } else {
            format!("{:<19} {:>7}  {}", bp.name(), cost, bp.effect())
        };
        push_hint(
            &mut cl,
            char::from(b'1' + i as u8),
            label,
            Action::BuyBlueprint(*bp).id(),
            !owned && state.golden_splinters >= bp.cost(),
        );
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(
            " Wooden Park {}/{} ",
            state.unlocked_blueprints.len(),
            Blueprint::all().len()
        ));

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &block, &mut cs, false);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Trophies ───────────────────────────────────────────────────

fn render_trophies(
    state: &EconomyState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    is_narrow: bool,
) {
    let bar_width = if is_narrow { 10 } else { 20 };
    let mut lines = Vec::new();
    for trophy in Trophy::all() {
        let (current, target) = trophy.progress(state);
        let (icon, color) = if trophy.is_complete(state) {
            ("★", Color::Yellow)
        } else {
            ("☆", Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(color)),
            Span::styled(
                trophy.name(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled(
                format!("   {} ", progress_bar(current, target, bar_width)),
                Style::default().fg(color),
            ),
            Span::styled(
                format!("{}/{}", format_compact(current), format_compact(target)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        if !is_narrow {
            lines.push(Line::from(Span::styled(
                format!("   {}", trophy.description()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Trophies ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Dev ────────────────────────────────────────────────────────

fn render_dev(
    game: &AcademyGame,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    push_hint(&mut cl, 'P', "+1M papers".to_string(), DEV_ADD_PAPERS, true);
    push_hint(&mut cl, 'K', "+1000 splinters".to_string(), DEV_ADD_SPLINTERS, true);
    push_hint(&mut cl, 'W', "Wipe save".to_string(), REQUEST_WIPE, true);
    if game.confirm_wipe {
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    " [Y] ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "Are you sure? This will erase ALL progress!",
                    Style::default().fg(Color::Red),
                ),
            ]),
            CONFIRM_WIPE,
        );
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Red))
        .title(" Dev ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &block, &mut cs, false);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Log & ticker ───────────────────────────────────────────────

fn render_log(game: &AcademyGame, f: &mut Frame, area: Rect, borders: Borders) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let start = game.log.len().saturating_sub(max_lines);
    let lines: Vec<Line> = game.log[start..]
        .iter()
        .map(|msg| {
            Line::from(Span::styled(
                format!(" > {}", msg),
                Style::default().fg(Color::DarkGray),
            ))
        })
        .collect();
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_ticker(game: &AcademyGame, f: &mut Frame, area: Rect) {
    let headline = NEWS[(game.ticks() / NEWS_TICKS) as usize % NEWS.len()];
    let line = Line::from(vec![
        Span::styled(" ◆ ", Style::default().fg(Color::Yellow)),
        Span::styled(headline, Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

// ── Overlays ───────────────────────────────────────────────────

fn render_overlay(
    overlay: &Overlay,
    now: Timestamp,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let popup = centered(area, 64, 12);
    let borders = borders_for(area.width);
    let mut cl = ClickableList::new();

    let (title, color) = match overlay {
        Overlay::Encounter(enc) => {
            encounter_lines(&mut cl, enc, now, popup.width);
            (format!(" {} ", enc.kind.title()), Color::Red)
        }
        Overlay::WelcomeBack(earned) => {
            cl.push(Line::from(Span::styled(
                " Your students kept working while you were away",
                Style::default().fg(Color::Gray),
            )));
            cl.push(Line::from(""));
            cl.push(Line::from(vec![
                Span::styled(" You earned ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} A+ Papers", format_compact(*earned as f64)),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ]));
            cl.push(Line::from(""));
            push_hint(&mut cl, 'Q', "Collect".to_string(), DISMISS, true);
            (" Welcome Back! ".to_string(), Color::Yellow)
        }
        Overlay::Intro(step) => {
            let text = INTRO_LINES.get(*step).copied().unwrap_or_default();
            cl.push(Line::from(Span::styled(
                format!(" \"{}\"", text),
                Style::default().fg(Color::White),
            )));
            cl.push(Line::from(""));
            cl.push(Line::from(Span::styled(
                format!(" {}/{}", step + 1, INTRO_LINES.len()),
                Style::default().fg(Color::DarkGray),
            )));
            let label = if step + 1 < INTRO_LINES.len() {
                "Next"
            } else {
                "Begin"
            };
            push_hint(&mut cl, 'Q', label.to_string(), DISMISS, true);
            (" The Founder ".to_string(), Color::Yellow)
        }
        Overlay::Victory => {
            cl.push(Line::from(Span::styled(
                " The Wooden Park Lives Again!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            cl.push(Line::from(Span::styled(
                " Through determination, teamwork, and an impressive amount of A+ papers, \
                 the students of Bee-Kay Academy have rebuilt the legendary Wooden Park.",
                Style::default().fg(Color::White),
            )));
            cl.push(Line::from(Span::styled(
                " Your legacy will be remembered in the halls of BK forever.",
                Style::default().fg(Color::Gray),
            )));
            push_hint(&mut cl, 'Q', "Continue Playing".to_string(), DISMISS, true);
            (" VICTORY! ".to_string(), Color::Yellow)
        }
    };

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let mut cs = click_state.borrow_mut();
    cl.register_targets(popup, &block, &mut cs, true);
    drop(cs);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

fn encounter_lines(cl: &mut ClickableList, enc: &Encounter, now: Timestamp, width: u16) {
    cl.push(Line::from(Span::styled(
        format!(" \"{}\"", enc.kind.line()),
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(Span::styled(
        format!(" {}", enc.kind.penalty()),
        Style::default().fg(Color::Red),
    )));
    cl.push(Line::from(vec![
        Span::styled(" Time left: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}s", enc.seconds_left(now)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(""));
    let bar_width = width.saturating_sub(16).min(30) as usize;
    cl.push(Line::from(Span::styled(
        format!(" {} {}%", progress_bar(enc.slide as f64, 100.0, bar_width), enc.slide),
        Style::default().fg(Color::Cyan),
    )));
    push_hint(cl, 'S', "Slide to study ▶▶".to_string(), SLIDE_TO_STUDY, true);
}

// ── Helpers ────────────────────────────────────────────────────

/// A `[K] label` row bound to `action_id`. Greyed out when not `enabled`,
/// but still clickable so the tap is swallowed rather than falling through.
fn push_hint(cl: &mut ClickableList, key: char, label: String, action_id: u16, enabled: bool) {
    let (key_color, text_color) = if enabled {
        (Color::Yellow, Color::White)
    } else {
        (Color::DarkGray, Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(key_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(text_color)),
        ]),
        action_id,
    );
}

fn progress_bar(current: f64, target: f64, width: usize) -> String {
    let ratio = if target > 0.0 {
        (current / target).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    "█".repeat(filled) + &"░".repeat(width.saturating_sub(filled))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 10.0, 4), "░░░░");
        assert_eq!(progress_bar(5.0, 10.0, 4), "██░░");
        assert_eq!(progress_bar(50.0, 10.0, 4), "████");
        assert_eq!(progress_bar(1.0, 0.0, 2), "░░");
    }

    #[test]
    fn centered_fits_inside() {
        let area = Rect::new(0, 0, 40, 20);
        let r = centered(area, 64, 12);
        assert_eq!(r, Rect::new(0, 4, 40, 12));
        let r = centered(Rect::new(10, 10, 100, 50), 64, 12);
        assert_eq!(r, Rect::new(28, 29, 64, 12));
    }

    #[test]
    fn next_preview_shows_the_following_goals_hint() {
        let mut s = EconomyState::new(0);
        // Working on goal 1, so the preview is goal 2's teaser.
        assert_eq!(next_preview(&s), Some("Stock up"));

        s.highest_goal_reached = 7;
        assert_eq!(next_preview(&s), Some("Victory!"));

        s.highest_goal_reached = 8;
        assert_eq!(next_preview(&s), None);
    }

    #[test]
    fn every_headline_gets_a_turn() {
        let seen: std::collections::BTreeSet<usize> = (0..NEWS.len() as u64 * NEWS_TICKS)
            .map(|t| (t / NEWS_TICKS) as usize % NEWS.len())
            .collect();
        assert_eq!(seen.len(), NEWS.len());
    }
}
