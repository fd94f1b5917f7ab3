use std::fmt;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// The two reaction glyphs that drive pinning. Every other emoji is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEmoji {
    Pin,
    Remove,
}

impl ControlEmoji {
    pub const ALL: [ControlEmoji; 2] = [ControlEmoji::Pin, ControlEmoji::Remove];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pin => "📌",
            Self::Remove => "🗑️",
        }
    }

    /// Matches a reaction's string form. Clients differ on whether they send
    /// the trailing emoji variation selector, so it is ignored here.
    pub fn from_reaction(reaction: &str) -> Option<Self> {
        let bare = reaction.trim_end_matches(VARIATION_SELECTOR_16);
        Self::ALL
            .into_iter()
            .find(|emoji| emoji.as_str().trim_end_matches(VARIATION_SELECTOR_16) == bare)
    }
}

impl fmt::Display for ControlEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
