use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::games::GameId;
use crate::roster::{PlayerRecord, Roster};

/// Recognition marker preceding the serialized payload. Lets the envelope sit
/// inside a larger human-readable blob without being mistaken for display
/// content.
pub const ROSTER_MARKER: &str = "LB_ROSTER_STATE::";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopePayload {
    #[serde(default)]
    players: Vec<PlayerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerEntry {
    player_name: String,
    role: String,
    rank_current: String,
    tier_current: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rank_peak: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tier_peak: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    peak_value: Option<u32>,
    date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeRecovery {
    MissingInput,
    MissingMarker,
    MalformedPayload,
}

/// Serialize a roster into its embeddable envelope form.
pub fn encode(roster: &Roster) -> String {
    let payload = EnvelopePayload {
        players: roster.players().iter().map(PlayerEntry::from_record).collect(),
    };

    match serde_json::to_string(&payload) {
        Ok(serialized) => format!("{ROSTER_MARKER}{serialized}"),
        Err(error) => {
            tracing::error!(encode_error = %error, "Failed to serialize roster payload");
            format!("{ROSTER_MARKER}{{\"players\":[]}}")
        }
    }
}

/// Reconstitute a roster from stored text. Total: missing input, a missing
/// marker, or a malformed payload all degrade to an empty roster.
pub fn decode(game: GameId, stored: Option<&str>) -> Roster {
    match decode_envelope(game, stored) {
        Ok(roster) => roster,
        Err(recovery) => {
            tracing::warn!(
                game = game.label(),
                reason = ?recovery,
                "Roster state unreadable, starting from an empty roster"
            );
            Roster::new(game)
        }
    }
}

fn decode_envelope(game: GameId, stored: Option<&str>) -> Result<Roster, DecodeRecovery> {
    let text = stored.ok_or(DecodeRecovery::MissingInput)?;
    if text.trim().is_empty() {
        return Err(DecodeRecovery::MissingInput);
    }

    let marker_offset = text.find(ROSTER_MARKER).ok_or(DecodeRecovery::MissingMarker)?;
    let payload_text = &text[marker_offset + ROSTER_MARKER.len()..];

    // A single JSON document is read off the front; surrounding trailing text
    // is legal.
    let mut deserializer = serde_json::Deserializer::from_str(payload_text);
    let payload = EnvelopePayload::deserialize(&mut deserializer)
        .map_err(|_| DecodeRecovery::MalformedPayload)?;

    let mut roster = Roster::new(game);
    for entry in payload.players {
        match DateTime::parse_from_rfc3339(&entry.date) {
            Ok(event_time) => {
                roster.push_record(entry.into_record(event_time.with_timezone(&Utc)));
            }
            Err(error) => {
                tracing::warn!(
                    player = %entry.player_name,
                    date_error = %error,
                    "Dropping roster entry with an unreadable date"
                );
            }
        }
    }

    Ok(roster)
}

impl PlayerEntry {
    fn from_record(record: &PlayerRecord) -> Self {
        Self {
            player_name: record.player_name.clone(),
            role: record.role.clone(),
            rank_current: record.rank_current.clone(),
            tier_current: record.tier_current,
            current_value: record.current_value,
            rank_peak: record.rank_peak.clone(),
            tier_peak: record.tier_peak,
            peak_value: record.peak_value,
            date: record
                .event_time
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn into_record(self, event_time: DateTime<Utc>) -> PlayerRecord {
        PlayerRecord {
            player_name: self.player_name,
            role: self.role,
            rank_current: self.rank_current,
            tier_current: self.tier_current,
            current_value: self.current_value,
            rank_peak: self.rank_peak,
            tier_peak: self.tier_peak,
            peak_value: self.peak_value,
            event_time,
        }
    }
}
