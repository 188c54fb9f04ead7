use std::cmp::Ordering;

use crate::games::GameId;
use crate::roster::{PlayerRecord, Roster};

/// Order a roster for display, best first. Pure and stable; the roster itself
/// is never mutated.
pub fn ranked(roster: &Roster) -> Vec<PlayerRecord> {
    let mut ordered = roster.players().to_vec();
    ordered.sort_by(comparator_for(roster.game()));
    ordered
}

// One comparator per game on purpose. The tier direction differs between
// games and a shared parameterized comparator invites sign-flip mistakes.
pub fn comparator_for(game: GameId) -> fn(&PlayerRecord, &PlayerRecord) -> Ordering {
    match game {
        GameId::MarvelRivals => compare_rivals,
        GameId::Overwatch => compare_overwatch,
        GameId::Deadlock => compare_deadlock,
    }
}

fn compare_rivals(left: &PlayerRecord, right: &PlayerRecord) -> Ordering {
    current_rank_index(GameId::MarvelRivals, right)
        .cmp(&current_rank_index(GameId::MarvelRivals, left))
        .then_with(|| left.tier_current.cmp(&right.tier_current))
        .then_with(|| {
            peak_rank_index(GameId::MarvelRivals, right)
                .cmp(&peak_rank_index(GameId::MarvelRivals, left))
        })
        .then_with(|| peak_tier(left).cmp(&peak_tier(right)))
        .then_with(|| right.event_time.cmp(&left.event_time))
}

fn compare_overwatch(left: &PlayerRecord, right: &PlayerRecord) -> Ordering {
    // Top 500 rows carry a leaderboard placement in the tier slot; the same
    // ascending compare applies to it unchanged (lower placement first).
    current_rank_index(GameId::Overwatch, right)
        .cmp(&current_rank_index(GameId::Overwatch, left))
        .then_with(|| left.tier_current.cmp(&right.tier_current))
        .then_with(|| {
            peak_rank_index(GameId::Overwatch, right)
                .cmp(&peak_rank_index(GameId::Overwatch, left))
        })
        .then_with(|| peak_tier(left).cmp(&peak_tier(right)))
        .then_with(|| right.event_time.cmp(&left.event_time))
}

fn compare_deadlock(left: &PlayerRecord, right: &PlayerRecord) -> Ordering {
    // Deadlock tiers grow toward the top of a rank, the inverse of the other
    // two games. Lower numeric value breaks the remaining ties.
    current_rank_index(GameId::Deadlock, right)
        .cmp(&current_rank_index(GameId::Deadlock, left))
        .then_with(|| right.tier_current.cmp(&left.tier_current))
        .then_with(|| deadlock_value(left).cmp(&deadlock_value(right)))
        .then_with(|| right.event_time.cmp(&left.event_time))
}

fn current_rank_index(game: GameId, record: &PlayerRecord) -> i64 {
    game.vocabulary().comparison_index(&record.rank_current)
}

fn peak_rank_index(game: GameId, record: &PlayerRecord) -> i64 {
    record
        .rank_peak
        .as_deref()
        .map(|rank| game.vocabulary().comparison_index(rank))
        .unwrap_or(-1)
}

fn peak_tier(record: &PlayerRecord) -> u32 {
    record.tier_peak.unwrap_or(u32::MAX)
}

fn deadlock_value(record: &PlayerRecord) -> u32 {
    record.current_value.unwrap_or(u32::MAX)
}
