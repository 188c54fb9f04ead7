use chrono::{DateTime, Utc};

use crate::event_time;
use crate::games::GameId;

const STRIPPED_CHARACTERS: &[char] = &['<', '>', '"', '\'', ';', '(', ')'];

/// One parsed rank-update event. Only the parser constructs these, so an
/// update with an out-of-range tier or value never exists.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerUpdate {
    pub game: GameId,
    pub player_name: String,
    pub role: String,
    pub rank_current: String,
    pub tier_current: u32,
    pub current_value: Option<u32>,
    pub rank_peak: Option<String>,
    pub tier_peak: Option<u32>,
    pub peak_value: Option<u32>,
    pub event_time: DateTime<Utc>,
    pub raw_date_text: String,
}

#[derive(Debug)]
struct GrammarMatch {
    rank_current: &'static str,
    tier_current: u32,
    current_value: Option<u32>,
    rank_peak: Option<&'static str>,
    tier_peak: Option<u32>,
    peak_value: Option<u32>,
    date_text: String,
}

/// Parse a raw channel message into a structured update. Returns `None` for
/// anything that is not a well-formed update for one of the tracked games.
pub fn parse_update_message(text: &str) -> Option<PlayerUpdate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let game = GameId::ALL
        .into_iter()
        .find(|game| starts_with_ignore_case(trimmed, game.message_prefix()))?;

    let body = trimmed[game.message_prefix().len()..].trim_start();
    let Some(body) = body.strip_prefix('@') else {
        tracing::debug!(game = game.label(), "Update rejected: missing @name marker");
        return None;
    };

    let tokens: Vec<&str> = body.split_whitespace().collect();
    parse_game_update(game, &tokens)
}

fn parse_game_update(game: GameId, tokens: &[&str]) -> Option<PlayerUpdate> {
    // The name may span several tokens; the single token before the first
    // position where the grammar matches is the role, everything before that
    // is the name. Scanning from the left mirrors a lazy name capture, so a
    // rank word inside a player name cannot steal the match.
    for rank_start in 2..tokens.len() {
        let Some(matched) = match_grammar_at(game, tokens, rank_start) else {
            continue;
        };

        if !tier_within_bounds(game, matched.rank_current, matched.tier_current) {
            tracing::debug!(
                game = game.label(),
                rank = matched.rank_current,
                tier = matched.tier_current,
                "Update rejected: tier outside bounds"
            );
            return None;
        }

        if let (Some(rank_peak), Some(tier_peak)) = (matched.rank_peak, matched.tier_peak) {
            if !tier_within_bounds(game, rank_peak, tier_peak) {
                tracing::debug!(
                    game = game.label(),
                    rank = rank_peak,
                    tier = tier_peak,
                    "Update rejected: peak tier outside bounds"
                );
                return None;
            }
        }

        let player_name = sanitize_field(&tokens[..rank_start - 1].join(" "));
        let role = sanitize_field(tokens[rank_start - 1]);
        if player_name.is_empty() || role.is_empty() {
            tracing::debug!(
                game = game.label(),
                "Update rejected: empty name or role after sanitizing"
            );
            return None;
        }

        let event_time = event_time::parse_event_time(&matched.date_text);

        return Some(PlayerUpdate {
            game,
            player_name,
            role,
            rank_current: matched.rank_current.to_string(),
            tier_current: matched.tier_current,
            current_value: matched.current_value,
            rank_peak: matched.rank_peak.map(str::to_string),
            tier_peak: matched.tier_peak,
            peak_value: matched.peak_value,
            event_time,
            raw_date_text: matched.date_text,
        });
    }

    tracing::debug!(game = game.label(), "Update rejected: no grammar match");
    None
}

fn match_grammar_at(game: GameId, tokens: &[&str], rank_start: usize) -> Option<GrammarMatch> {
    let (rank_current, mut cursor) = match_rank(game, tokens, rank_start)?;
    let tier_current = parse_number(tokens.get(cursor)?)?;
    cursor += 1;

    let mut current_value = None;
    let mut rank_peak = None;
    let mut tier_peak = None;
    let mut peak_value = None;

    match game {
        GameId::MarvelRivals => {
            let (peak, after_peak) = match_rank(game, tokens, cursor)?;
            rank_peak = Some(peak);
            tier_peak = Some(parse_number(tokens.get(after_peak)?)?);
            cursor = after_peak + 1;
        }
        GameId::Overwatch => {
            current_value = Some(parse_number(tokens.get(cursor)?)?);
            cursor += 1;

            let (peak, after_peak) = match_rank(game, tokens, cursor)?;
            rank_peak = Some(peak);
            tier_peak = Some(parse_number(tokens.get(after_peak)?)?);
            peak_value = Some(parse_number(tokens.get(after_peak + 1)?)?);
            cursor = after_peak + 2;
        }
        GameId::Deadlock => {
            current_value = Some(parse_number(tokens.get(cursor)?)?);
            cursor += 1;
        }
    }

    if cursor >= tokens.len() {
        // Date tokens are a required field.
        return None;
    }

    Some(GrammarMatch {
        rank_current,
        tier_current,
        current_value,
        rank_peak,
        tier_peak,
        peak_value,
        date_text: tokens[cursor..].join(" "),
    })
}

fn match_rank(game: GameId, tokens: &[&str], start: usize) -> Option<(&'static str, usize)> {
    for candidate in game.vocabulary().match_order() {
        let words: Vec<&str> = candidate.split_whitespace().collect();
        let end = start + words.len();
        if end > tokens.len() {
            continue;
        }

        let matches = words
            .iter()
            .zip(&tokens[start..end])
            .all(|(expected, actual)| expected.eq_ignore_ascii_case(actual));
        if matches {
            return Some((candidate, end));
        }
    }

    None
}

fn tier_within_bounds(game: GameId, rank_name: &str, tier: u32) -> bool {
    if game.is_placement_rank(rank_name) {
        // The tier slot holds a leaderboard placement here, unbounded above.
        return tier >= 1;
    }

    (1..=game.tier_bound()).contains(&tier)
}

fn parse_number(token: &str) -> Option<u32> {
    token.parse::<u32>().ok()
}

fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .filter(|character| !STRIPPED_CHARACTERS.contains(character))
        .collect::<String>()
        .trim()
        .to_string()
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}
