//! Input plumbing between the browser and the academy: pointer positions
//! become terminal cells, cells become action IDs.
//!
//! Nothing here knows about the economy. The controller maps events to
//! actions itself.

use ratzilla::ratatui::layout::Rect;

/// Below this many columns panels drop their side borders and collapse
/// to a single column.
pub const NARROW_WIDTH: u16 = 60;

/// Keyboard and pointer input, normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press, already lowercased.
    Key(char),
    /// A tap on a registered target, identified by its action ID
    /// (see `academy::actions`).
    Click(u16),
}

/// A tappable screen region.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

impl ClickTarget {
    fn contains(&self, col: u16, row: u16) -> bool {
        let r = self.rect;
        (r.x..r.x.saturating_add(r.width)).contains(&col)
            && (r.y..r.y.saturating_add(r.height)).contains(&row)
    }
}

/// Targets registered by the last frame, shared between the render loop
/// and the pointer handler.
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's targets and record the grid size of this one.
    pub fn begin_frame(&mut self, area: Rect) {
        self.terminal_cols = area.width;
        self.terminal_rows = area.height;
        self.targets.clear();
    }

    /// No frame drawn yet, so no pointer can be mapped.
    pub fn is_empty_grid(&self) -> bool {
        self.terminal_cols == 0 || self.terminal_rows == 0
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// A full-width, one-row target. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if (area.y..area.y.saturating_add(area.height)).contains(&row) {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a row of tab labels.
    ///
    /// `tabs` holds `(label_width, action_id)` in display order, each label
    /// separated by `separator_width` columns. Each tab owns its label plus
    /// half of the gap on either side; the outer tabs stretch to the edges
    /// of `total_width` so the whole bar is tappable.
    pub fn register_tab_targets(
        &mut self,
        tabs: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        if tabs.is_empty() || total_width == 0 {
            return;
        }

        // Label spans as [start, end) columns relative to `x`.
        let mut spans = Vec::with_capacity(tabs.len());
        let mut cursor = 0u16;
        for &(width, _) in tabs {
            spans.push((cursor, cursor + width));
            cursor += width + separator_width;
        }

        let mut left = 0;
        for (i, &(_, action_id)) in tabs.iter().enumerate() {
            let right = match spans.get(i + 1) {
                Some(&(next_start, _)) => {
                    let end = spans[i].1;
                    end + (next_start - end) / 2
                }
                None => total_width,
            };
            if right > left {
                self.add_click_target(Rect::new(x + left, y, right - left, height), action_id);
            }
            left = right;
        }
    }

    /// Action under a cell. Later targets sit on top, so popups registered
    /// after the panels beneath them win.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| t.contains(col, row))
            .map(|t| t.action_id)
    }

    /// Map a pointer offset inside a `grid_width` × `grid_height` pixel
    /// grid to the action under it.
    pub fn hit_test_pixels(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_to_cell(x, grid_width, self.terminal_cols)?;
        let row = pixel_to_cell(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

pub fn is_narrow_layout(width: u16) -> bool {
    width < NARROW_WIDTH
}

/// Cell index along one axis for a pixel offset from the grid's edge.
/// `None` when outside the grid or when the grid has no size.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
