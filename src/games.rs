use serde::{Deserialize, Serialize};

const RIVALS_RANKS: &[&str] = &[
    "Bronze",
    "Silver",
    "Gold",
    "Platinum",
    "Diamond",
    "Grandmaster",
    "Celestial",
    "Eternity",
    "One Above All",
];

const OVERWATCH_RANKS: &[&str] = &[
    "Bronze",
    "Silver",
    "Gold",
    "Platinum",
    "Diamond",
    "Master",
    "Grandmaster",
    "Champion",
    "Top 500",
];

const DEADLOCK_RANKS: &[&str] = &[
    "Initiate",
    "Seeker",
    "Alchemist",
    "Arcanist",
    "Ritualist",
    "Emissary",
    "Archon",
    "Oracle",
    "Phantom",
    "Ascendant",
    "Eternus",
];

lazy_static::lazy_static! {
    static ref RIVALS_VOCABULARY: RankVocabulary = RankVocabulary::new(RIVALS_RANKS);
    static ref OVERWATCH_VOCABULARY: RankVocabulary = RankVocabulary::new(OVERWATCH_RANKS);
    static ref DEADLOCK_VOCABULARY: RankVocabulary = RankVocabulary::new(DEADLOCK_RANKS);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameId {
    MarvelRivals,
    Overwatch,
    Deadlock,
}

impl GameId {
    pub const ALL: [GameId; 3] = [GameId::MarvelRivals, GameId::Overwatch, GameId::Deadlock];

    pub fn message_prefix(self) -> &'static str {
        match self {
            GameId::MarvelRivals => "LB_UPDATE_MR:",
            GameId::Overwatch => "LB_UPDATE_OW:",
            GameId::Deadlock => "LB_UPDATE_DL:",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameId::MarvelRivals => "Marvel Rivals",
            GameId::Overwatch => "Overwatch",
            GameId::Deadlock => "Deadlock",
        }
    }

    pub fn vocabulary(self) -> &'static RankVocabulary {
        match self {
            GameId::MarvelRivals => &RIVALS_VOCABULARY,
            GameId::Overwatch => &OVERWATCH_VOCABULARY,
            GameId::Deadlock => &DEADLOCK_VOCABULARY,
        }
    }

    pub fn tier_bound(self) -> u32 {
        match self {
            GameId::MarvelRivals => 3,
            GameId::Overwatch => 5,
            GameId::Deadlock => 6,
        }
    }

    /// Rank whose tier slot holds a leaderboard placement instead of a tier
    /// depth, exempt from the normal tier bound.
    pub fn placement_bracket(self) -> Option<&'static str> {
        match self {
            GameId::Overwatch => Some("Top 500"),
            GameId::MarvelRivals | GameId::Deadlock => None,
        }
    }

    pub fn is_placement_rank(self, rank_name: &str) -> bool {
        self.placement_bracket()
            .is_some_and(|bracket| bracket.eq_ignore_ascii_case(rank_name.trim()))
    }
}

/// Ordered rank names for one game, worst first. Position in the list is the
/// comparison index.
#[derive(Debug)]
pub struct RankVocabulary {
    names: &'static [&'static str],
    match_order: Vec<&'static str>,
}

impl RankVocabulary {
    fn new(names: &'static [&'static str]) -> Self {
        let mut match_order = names.to_vec();
        // Multi-word ranks must be tried before shorter overlapping tokens.
        match_order.sort_by(|left, right| {
            let left_words = left.split_whitespace().count();
            let right_words = right.split_whitespace().count();
            right_words
                .cmp(&left_words)
                .then_with(|| right.len().cmp(&left.len()))
        });

        Self { names, match_order }
    }

    pub fn index_of(&self, rank_name: &str) -> Option<usize> {
        let needle = rank_name.trim();
        self.names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(needle))
    }

    pub fn canonical(&self, rank_name: &str) -> Option<&'static str> {
        let needle = rank_name.trim();
        self.names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(needle))
            .copied()
    }

    pub fn comparison_index(&self, rank_name: &str) -> i64 {
        self.index_of(rank_name)
            .map(|index| index as i64)
            .unwrap_or(-1)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn match_order(&self) -> &[&'static str] {
        &self.match_order
    }
}
