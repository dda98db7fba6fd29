//! Symbol definitions

use serde::{Deserialize, Serialize};

/// A grid symbol
///
/// Ten paying symbols (lowest to highest paying) and the scatter. Declaration
/// order is the order used for weight tables and win reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    BlueGem = 0,
    GreenGem = 1,
    RedGem = 2,
    PurpleGem = 3,
    YellowGem = 4,
    Hourglass = 5,
    Ring = 6,
    Sword = 7,
    Cup = 8,
    Crown = 9,
    /// Pays by count anywhere and triggers free spins
    Scatter = 10,
}

impl Symbol {
    /// Every symbol in declaration order
    pub const ALL: [Symbol; 11] = [
        Symbol::BlueGem,
        Symbol::GreenGem,
        Symbol::RedGem,
        Symbol::PurpleGem,
        Symbol::YellowGem,
        Symbol::Hourglass,
        Symbol::Ring,
        Symbol::Sword,
        Symbol::Cup,
        Symbol::Crown,
        Symbol::Scatter,
    ];

    /// Number of symbols
    pub const COUNT: usize = Self::ALL.len();

    /// Paying (count-evaluated) symbols
    pub fn paying() -> impl Iterator<Item = Symbol> {
        Self::ALL.into_iter().filter(|s| !s.is_scatter())
    }

    /// Dense index, usable for counting arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Symbol at a dense index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_scatter(self) -> bool {
        self == Symbol::Scatter
    }

    /// Wire name, matching the serde form
    pub fn name(self) -> &'static str {
        match self {
            Symbol::BlueGem => "blue_gem",
            Symbol::GreenGem => "green_gem",
            Symbol::RedGem => "red_gem",
            Symbol::PurpleGem => "purple_gem",
            Symbol::YellowGem => "yellow_gem",
            Symbol::Hourglass => "hourglass",
            Symbol::Ring => "ring",
            Symbol::Sword => "sword",
            Symbol::Cup => "cup",
            Symbol::Crown => "crown",
            Symbol::Scatter => "scatter",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for symbol in Symbol::ALL {
            assert_eq!(Symbol::from_index(symbol.index()), Some(symbol));
        }
        assert_eq!(Symbol::from_index(Symbol::COUNT), None);
    }

    #[test]
    fn test_paying_excludes_scatter() {
        let paying: Vec<_> = Symbol::paying().collect();
        assert_eq!(paying.len(), 10);
        assert!(!paying.contains(&Symbol::Scatter));
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&Symbol::YellowGem).unwrap();
        assert_eq!(json, "\"yellow_gem\"");
        assert_eq!(Symbol::YellowGem.to_string(), "yellow_gem");
    }
}
