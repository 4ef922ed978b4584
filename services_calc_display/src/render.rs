//! Display rendering

use calc_core::{EntryMode, ExpressionBuffer, FormattedView};
use serde::{Deserialize, Serialize};

use crate::config::FontTiers;

/// Placeholder shown under the cursor when it sits past the last character
pub const END_CURSOR_GLYPH: char = '\u{a0}';

/// Placeholder text on the main display while a result is shown
pub const RESULT_PLACEHOLDER: &str = "0";

/// Font size chosen by formatted length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontTier {
    Large,
    Medium,
    Small,
}

impl FontTier {
    pub fn for_length(len: usize, tiers: &FontTiers) -> Self {
        if len > tiers.small_above {
            FontTier::Small
        } else if len > tiers.medium_above {
            FontTier::Medium
        } else {
            FontTier::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontTier::Large => "large",
            FontTier::Medium => "medium",
            FontTier::Small => "small",
        }
    }
}

/// Main display split around the cursor glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDisplay {
    pub before: String,
    pub cursor_glyph: char,
    pub after: String,
    pub font_tier: FontTier,
    /// True while a function result occupies the display
    pub result_placeholder: bool,
}

impl RenderedDisplay {
    /// Render the live buffer
    pub fn editing(buffer: &ExpressionBuffer, tiers: &FontTiers) -> Self {
        let view = FormattedView::derive(buffer.text(), buffer.cursor());
        let font_tier = FontTier::for_length(view.char_len(), tiers);

        let mut chars = view.text.chars();
        let before: String = chars.by_ref().take(view.cursor).collect();
        let cursor_glyph = chars.next().unwrap_or(END_CURSOR_GLYPH);
        let after: String = chars.collect();

        Self {
            before,
            cursor_glyph,
            after,
            font_tier,
            result_placeholder: false,
        }
    }

    /// Fixed placeholder while the result viewer is active
    pub fn placeholder(tiers: &FontTiers) -> Self {
        let mut chars = RESULT_PLACEHOLDER.chars();
        let cursor_glyph = chars.next().unwrap_or(END_CURSOR_GLYPH);
        Self {
            before: String::new(),
            cursor_glyph,
            after: chars.collect(),
            font_tier: FontTier::for_length(RESULT_PLACEHOLDER.len(), tiers),
            result_placeholder: true,
        }
    }

    /// Formatted text without the cursor
    pub fn text(&self) -> String {
        let mut text = self.before.clone();
        if self.cursor_glyph != END_CURSOR_GLYPH {
            text.push(self.cursor_glyph);
        }
        text.push_str(&self.after);
        text
    }

    /// Display offset of the cursor
    pub fn cursor(&self) -> usize {
        self.before.chars().count()
    }

    /// Text with the cursor glyph bracketed, e.g. `1,23[4]`
    pub fn marked(&self) -> String {
        let glyph = if self.cursor_glyph == END_CURSOR_GLYPH {
            ' '
        } else {
            self.cursor_glyph
        };
        format!("{}[{}]{}", self.before, glyph, self.after)
    }
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayView {
    pub main: RenderedDisplay,
    /// Sub-display text
    pub status: String,
    pub entry_mode: EntryMode,
    /// Result lines inside the viewport, empty while editing
    pub result_lines: Vec<String>,
    pub up_indicator: bool,
    pub down_indicator: bool,
}
