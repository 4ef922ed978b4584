//! Entry modes

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// How character entry treats the text under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum EntryMode {
    /// Entry pushes existing text right
    #[default]
    Insert,
    /// Entry replaces the character under the cursor
    Overwrite,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Insert => "INS",
            EntryMode::Overwrite => "OVR",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            EntryMode::Insert => EntryMode::Overwrite,
            EntryMode::Overwrite => EntryMode::Insert,
        }
    }
}
