use chrono::{DateTime, Utc};

use crate::games::GameId;
use crate::message::PlayerUpdate;

/// Persisted roster entry. Identity is the lowercased player name; one entry
/// per distinct player per game.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player_name: String,
    pub role: String,
    pub rank_current: String,
    pub tier_current: u32,
    pub current_value: Option<u32>,
    pub rank_peak: Option<String>,
    pub tier_peak: Option<u32>,
    pub peak_value: Option<u32>,
    pub event_time: DateTime<Utc>,
}

impl From<PlayerUpdate> for PlayerRecord {
    fn from(update: PlayerUpdate) -> Self {
        Self {
            player_name: update.player_name,
            role: update.role,
            rank_current: update.rank_current,
            tier_current: update.tier_current,
            current_value: update.current_value,
            rank_peak: update.rank_peak,
            tier_peak: update.tier_peak,
            peak_value: update.peak_value,
            event_time: update.event_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    game: GameId,
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new(game: GameId) -> Self {
        Self {
            game,
            players: Vec::new(),
        }
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Merge one update into the roster, last write wins by event time.
    ///
    /// A strictly earlier event time than the stored record is a stale update
    /// arriving out of order; it leaves the roster untouched and returns
    /// false. An equal or later event time fully replaces the record.
    pub fn upsert(&mut self, update: PlayerUpdate) -> bool {
        let identity = update.player_name.to_lowercase();
        let Some(existing) = self
            .players
            .iter_mut()
            .find(|record| record.player_name.to_lowercase() == identity)
        else {
            self.players.push(update.into());
            return true;
        };

        if update.event_time < existing.event_time {
            tracing::debug!(
                player = %update.player_name,
                update_time = %update.event_time,
                stored_time = %existing.event_time,
                "Stale update ignored"
            );
            return false;
        }

        *existing = update.into();
        true
    }

    pub(crate) fn push_record(&mut self, record: PlayerRecord) {
        self.players.push(record);
    }
}
