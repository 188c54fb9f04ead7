use crate::games::GameId;
use crate::ranking;
use crate::roster::{PlayerRecord, Roster};

/// Render a roster as leaderboard text, best player first. Ordering comes
/// entirely from the comparator; this layer only formats.
pub fn render_leaderboard(roster: &Roster) -> String {
    let mut lines = vec![format!("{} Leaderboard", roster.game().label())];

    if roster.is_empty() {
        lines.push("No tracked players yet.".to_string());
        return lines.join("\n");
    }

    for (index, record) in ranking::ranked(roster).iter().enumerate() {
        lines.push(render_entry(roster.game(), index + 1, record));
    }

    lines.join("\n")
}

fn render_entry(game: GameId, position: usize, record: &PlayerRecord) -> String {
    let mut entry = format!(
        "{position}. {} ({}) {}",
        record.player_name,
        record.role,
        format_rank(game, &record.rank_current, record.tier_current)
    );

    if let Some(value) = record.current_value {
        entry.push_str(&format!(" [{value}]"));
    }

    if let (Some(rank_peak), Some(tier_peak)) = (record.rank_peak.as_deref(), record.tier_peak) {
        entry.push_str(&format!(" (peak {}", format_rank(game, rank_peak, tier_peak)));
        if let Some(peak_value) = record.peak_value {
            entry.push_str(&format!(" [{peak_value}]"));
        }
        entry.push(')');
    }

    entry
}

fn format_rank(game: GameId, rank_name: &str, tier: u32) -> String {
    if game.is_placement_rank(rank_name) {
        format!("{rank_name} #{tier}")
    } else {
        format!("{rank_name} {tier}")
    }
}

#[cfg(test)]
mod tests {
    use super::render_leaderboard;
    use crate::games::GameId;
    use crate::roster::{PlayerRecord, Roster};
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn an_empty_roster_renders_a_placeholder() {
        let board = render_leaderboard(&Roster::new(GameId::Deadlock));

        assert_eq!(board, "Deadlock Leaderboard\nNo tracked players yet.");
    }

    #[test]
    fn entries_are_numbered_in_comparator_order() {
        let mut roster = Roster::new(GameId::MarvelRivals);
        roster.push_record(record("Runner", "Diamond", 2));
        roster.push_record(record("Leader", "Eternity", 1));

        let board = render_leaderboard(&roster);
        let lines: Vec<&str> = board.lines().collect();

        assert_eq!(lines[0], "Marvel Rivals Leaderboard");
        assert!(lines[1].starts_with("1. Leader"));
        assert!(lines[2].starts_with("2. Runner"));
    }

    #[test]
    fn peaks_and_values_are_shown_when_present() {
        let mut roster = Roster::new(GameId::Overwatch);
        let mut entry = record("Mercy Main", "Diamond", 3);
        entry.role = "Support".to_string();
        entry.current_value = Some(2850);
        entry.rank_peak = Some("Master".to_string());
        entry.tier_peak = Some(5);
        entry.peak_value = Some(3100);
        roster.push_record(entry);

        let board = render_leaderboard(&roster);

        assert!(board.contains("1. Mercy Main (Support) Diamond 3 [2850] (peak Master 5 [3100])"));
    }

    #[test]
    fn top_500_renders_as_a_placement() {
        let mut roster = Roster::new(GameId::Overwatch);
        roster.push_record(record("Ace", "Top 500", 137));

        let board = render_leaderboard(&roster);

        assert!(board.contains("Top 500 #137"));
    }

    fn fixture_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0)
            .single()
            .expect("Fixture instant should be valid")
    }

    fn record(name: &str, rank: &str, tier: u32) -> PlayerRecord {
        PlayerRecord {
            player_name: name.to_string(),
            role: "Flex".to_string(),
            rank_current: rank.to_string(),
            tier_current: tier,
            current_value: None,
            rank_peak: None,
            tier_peak: None,
            peak_value: None,
            event_time: fixture_time(),
        }
    }
}
