//! Floating tooltip state and placement.
//!
//! The tooltip is a floating overlay centered horizontally on the pointer
//! and 10 px above it, clamped to the wrapper bounds. Content is structured
//! (heading plus detail lines); hosts decide the markup.

/// Structured tooltip content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TooltipContent {
    /// Heading line.
    pub heading: String,
    /// Detail lines under the heading.
    pub lines: Vec<String>,
}

impl TooltipContent {
    /// Content with a heading only.
    #[must_use]
    pub fn heading(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    /// Add a detail line.
    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

/// Current tooltip placement and content.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    /// Left edge in wrapper coordinates.
    pub x: f64,
    /// Top edge in wrapper coordinates.
    pub y: f64,
    /// Whether the tooltip is showing.
    pub visible: bool,
    /// Content.
    pub content: TooltipContent,
}

/// Approximate character advance for size estimation.
const CHAR_ADVANCE: f64 = 6.5;
/// Horizontal padding inside the tooltip.
const PAD_X: f64 = 16.0;
/// Heading height.
const HEADING_HEIGHT: f64 = 18.0;
/// Detail line height.
const LINE_HEIGHT: f64 = 14.0;
/// Vertical padding inside the tooltip.
const PAD_Y: f64 = 8.0;
/// Gap between the pointer and the tooltip bottom.
const POINTER_GAP: f64 = 10.0;

/// Estimated rendered size of the content.
#[must_use]
pub fn estimate_size(content: &TooltipContent) -> (f64, f64) {
    let widest = content
        .lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(content.heading.chars().count()))
        .max()
        .unwrap_or(0);

    (
        widest as f64 * CHAR_ADVANCE + PAD_X,
        HEADING_HEIGHT + content.lines.len() as f64 * LINE_HEIGHT + PAD_Y,
    )
}

/// Tooltip controller, one per chart.
#[derive(Debug, Clone, Default)]
pub struct Tooltip {
    state: Option<TooltipState>,
}

impl Tooltip {
    /// Show the tooltip near the pointer, clamped into `bounds`.
    pub fn show(&mut self, x: f64, y: f64, bounds: (f64, f64), content: TooltipContent) {
        let (w, h) = estimate_size(&content);
        let (left, top) = place(x, y, w, h, bounds);
        self.state = Some(TooltipState {
            x: left,
            y: top,
            visible: true,
            content,
        });
    }

    /// Move the tooltip without changing content. No-op while hidden.
    pub fn update(&mut self, x: f64, y: f64, bounds: (f64, f64)) {
        if let Some(state) = self.state.as_mut().filter(|s| s.visible) {
            let (w, h) = estimate_size(&state.content);
            let (left, top) = place(x, y, w, h, bounds);
            state.x = left;
            state.y = top;
        }
    }

    /// Hide the tooltip, keeping its content for a later `update`/`show`.
    pub fn hide(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.visible = false;
        }
    }

    /// Drop the tooltip entirely.
    pub fn remove(&mut self) {
        self.state = None;
    }

    /// Current state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&TooltipState> {
        self.state.as_ref()
    }

    /// Whether the tooltip is currently visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.visible)
    }
}

fn place(x: f64, y: f64, w: f64, h: f64, bounds: (f64, f64)) -> (f64, f64) {
    let mut left = x - w / 2.0;
    let mut top = y - h - POINTER_GAP;

    if left < 0.0 {
        left = 0.0;
    } else if left + w > bounds.0 {
        left = bounds.0 - w;
    }
    if top < 0.0 {
        top = 0.0;
    }

    (left, top)
}
