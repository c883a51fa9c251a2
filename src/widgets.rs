//! Widgets that draw themselves and register their own click targets, so
//! a row on screen and the action it triggers can never drift apart.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

struct TabEntry {
    label: String,
    style: Style,
    action_id: u16,
}

/// One row of tab labels. Targets are measured from the rendered text, so
/// labels of any width (and glyphs wider than one cell) stay aligned.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Shop", selected, Action::SelectTab(Tab::Shop).id())
///     .tab("Park", idle, Action::SelectTab(Tab::Park).id())
///     .block(block)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<TabEntry>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push(TabEntry {
            label: format!(" {} ", label.into()),
            style,
            action_id,
        });
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let separator_width = Line::from(self.separator).width() as u16;
        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));

        let widths: Vec<(u16, u16)> = self
            .tabs
            .iter()
            .map(|t| (Line::from(t.label.as_str()).width() as u16, t.action_id))
            .collect();

        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, tab) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(tab.label, tab.style));
        }

        let mut paragraph = Paragraph::new(Line::from(spans));
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        f.render_widget(paragraph, area);

        // Inner columns for accuracy, the full outer height so a tap on the
        // border still lands.
        cs.register_tab_targets(
            &widths,
            separator_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines for a bordered [`Paragraph`], some of them bound to actions.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Papers: 120"));
/// cl.push_clickable(Line::from(" [C] Write a paper"), WRITE_PAPER);
/// cl.register_targets(area, &block, &mut cs, false);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    actions: Vec<Option<u16>>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
        self.actions.push(None);
    }

    /// Bind `line` to `action_id`. The target follows the line wherever
    /// it ends up.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.lines.push(line);
        self.actions.push(Some(action_id));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target for every clickable line as it will appear
    /// inside `block` drawn over `area`. With `wrapped`, a line wider than
    /// the inner area is assumed to spill over onto following rows, and
    /// every row it covers is tappable.
    pub fn register_targets(&self, area: Rect, block: &Block, cs: &mut ClickState, wrapped: bool) {
        let inner = block.inner(area);
        let end = inner.y.saturating_add(inner.height);
        let width = inner.width.max(1) as usize;

        let mut row = inner.y;
        for (line, action) in self.lines.iter().zip(&self.actions) {
            if row >= end {
                break;
            }
            let height = if wrapped {
                line.width().div_ceil(width).max(1) as u16
            } else {
                1
            };
            if let Some(id) = *action {
                for r in row..row.saturating_add(height).min(end) {
                    cs.add_row_target(area, r, id);
                }
            }
            row = row.saturating_add(height);
        }
    }
}
