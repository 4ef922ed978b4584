//! # Result Viewer
//!
//! Read-only multi-line pane for a function result.
//!
//! ## Design
//!
//! - Lines are fixed once shown; the viewer is rebuilt for every result
//! - Scrolling is measured in display units, one `line_height` per step
//! - `scroll_offset` stays within `[0, max_scroll]`

/// Slack for line boundaries computed from fractional heights
const LINE_EPSILON: f64 = 1e-9;

/// Scrollable result pane
#[derive(Debug, Clone, PartialEq)]
pub struct ResultViewer {
    lines: Vec<String>,
    line_height: f64,
    viewport_height: f64,
    scroll_offset: f64,
}

impl ResultViewer {
    /// Create a viewer scrolled to the top
    ///
    /// # Arguments
    /// * `lines` - Rendered result lines
    /// * `line_height` - Height of one line
    /// * `viewport_height` - Height of the visible pane
    pub fn new(lines: Vec<String>, line_height: f64, viewport_height: f64) -> Self {
        Self {
            lines,
            line_height,
            viewport_height,
            scroll_offset: 0.0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined as the block shown in the pane
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn content_height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    /// True when the content overflows the viewport
    pub fn is_scrollable(&self) -> bool {
        self.content_height() > self.viewport_height
    }

    /// Scroll one line towards the top
    pub fn scroll_up(&mut self) -> bool {
        let next = (self.scroll_offset - self.line_height).max(0.0);
        self.set_offset(next)
    }

    /// Scroll one line towards the bottom
    pub fn scroll_down(&mut self) -> bool {
        let next = (self.scroll_offset + self.line_height).min(self.max_scroll());
        self.set_offset(next)
    }

    pub fn up_indicator(&self) -> bool {
        self.scroll_offset > 0.0
    }

    pub fn down_indicator(&self) -> bool {
        self.scroll_offset < self.max_scroll()
    }

    /// Lines at least partly inside the viewport
    pub fn visible_lines(&self) -> &[String] {
        if self.line_height <= 0.0 {
            return &self.lines;
        }
        let first = (self.scroll_offset / self.line_height + LINE_EPSILON).floor() as usize;
        let last = ((self.scroll_offset + self.viewport_height) / self.line_height - LINE_EPSILON)
            .ceil() as usize;
        let first = first.min(self.lines.len());
        let last = last.clamp(first, self.lines.len());
        &self.lines[first..last]
    }

    fn set_offset(&mut self, next: f64) -> bool {
        if next == self.scroll_offset {
            return false;
        }
        self.scroll_offset = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_short_content_is_not_scrollable() {
        let mut viewer = ResultViewer::new(lines(3), 10.0, 30.0);
        assert!(!viewer.is_scrollable());
        assert_eq!(viewer.max_scroll(), 0.0);
        assert!(!viewer.up_indicator());
        assert!(!viewer.down_indicator());
        assert!(!viewer.scroll_down());
        assert!(!viewer.scroll_up());
    }

    #[test]
    fn test_scroll_clamps_to_range() {
        let mut viewer = ResultViewer::new(lines(5), 10.0, 30.0);
        assert!(viewer.is_scrollable());
        assert_eq!(viewer.max_scroll(), 20.0);
        assert!(viewer.down_indicator());
        assert!(!viewer.up_indicator());

        assert!(viewer.scroll_down());
        assert_eq!(viewer.scroll_offset(), 10.0);
        assert!(viewer.up_indicator());
        assert!(viewer.down_indicator());

        assert!(viewer.scroll_down());
        assert!(!viewer.scroll_down());
        assert_eq!(viewer.scroll_offset(), 20.0);
        assert!(!viewer.down_indicator());

        assert!(viewer.scroll_up());
        assert!(viewer.scroll_up());
        assert!(!viewer.scroll_up());
        assert_eq!(viewer.scroll_offset(), 0.0);
    }

    #[test]
    fn test_partial_last_step_clamps() {
        let mut viewer = ResultViewer::new(lines(4), 10.0, 25.0);
        assert_eq!(viewer.max_scroll(), 15.0);
        viewer.scroll_down();
        viewer.scroll_down();
        assert_eq!(viewer.scroll_offset(), 15.0);
        assert!(!viewer.down_indicator());
    }

    #[test]
    fn test_visible_lines_follow_scroll() {
        let mut viewer = ResultViewer::new(lines(5), 10.0, 30.0);
        assert_eq!(viewer.visible_lines(), &lines(5)[0..3]);
        viewer.scroll_down();
        assert_eq!(viewer.visible_lines(), &lines(5)[1..4]);
    }

    #[test]
    fn test_fractional_line_height() {
        let mut viewer = ResultViewer::new(lines(4), 25.2, 75.6);
        assert!(viewer.is_scrollable());
        assert_eq!(viewer.visible_lines().len(), 3);
        viewer.scroll_down();
        assert_eq!(viewer.visible_lines(), &lines(4)[1..4]);
    }

    #[test]
    fn test_text_joins_lines() {
        let viewer = ResultViewer::new(vec!["a: 1".into(), "b: 2".into()], 10.0, 30.0);
        assert_eq!(viewer.text(), "a: 1\nb: 2");
    }
}
