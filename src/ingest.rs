use crate::envelope;
use crate::games::GameId;
use crate::message;
use crate::render;
use crate::roster::Roster;

/// Explicit per-channel configuration. The endpoint identifiers are opaque to
/// the core and only routed back to the collaborators.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub game: GameId,
    pub feed_channel: String,
    pub board_channel: String,
    pub board_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub text: String,
    pub arrival_order: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub received: usize,
    pub applied: usize,
    pub stale: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub game: GameId,
    pub stats: BatchStats,
    pub player_count: usize,
    pub board: String,
}

/// Supplies and accepts the persisted envelope text for one channel.
pub trait RosterStore {
    fn load(&mut self, config: &ChannelConfig) -> Result<Option<String>, String>;
    fn store(&mut self, config: &ChannelConfig, envelope_text: &str) -> Result<(), String>;
}

/// Accepts the rendered leaderboard for one channel.
pub trait BoardPublisher {
    fn publish(&mut self, config: &ChannelConfig, board: &str) -> Result<(), String>;
}

/// Merge a batch of raw messages into a roster, in arrival order. Event-time
/// conflicts are settled per player inside `Roster::upsert`.
pub fn apply_batch(roster: &mut Roster, messages: &[InboundMessage]) -> BatchStats {
    let mut ordered: Vec<&InboundMessage> = messages.iter().collect();
    ordered.sort_by_key(|inbound| inbound.arrival_order);

    let mut stats = BatchStats {
        received: messages.len(),
        ..BatchStats::default()
    };

    for inbound in ordered {
        let Some(update) = message::parse_update_message(&inbound.text) else {
            stats.rejected += 1;
            continue;
        };

        if update.game != roster.game() {
            tracing::debug!(
                expected = roster.game().label(),
                received = update.game.label(),
                "Update for another game skipped"
            );
            stats.rejected += 1;
            continue;
        }

        if roster.upsert(update) {
            stats.applied += 1;
        } else {
            stats.stale += 1;
        }
    }

    stats
}

/// One full ingestion run for one channel: reload persisted state, merge the
/// batch, publish the rendered board, persist the new state. The core holds
/// nothing across runs.
pub fn run_ingest(
    config: &ChannelConfig,
    messages: &[InboundMessage],
    store: &mut dyn RosterStore,
    publisher: &mut dyn BoardPublisher,
) -> Result<IngestReport, String> {
    let stored = store.load(config)?;
    let mut roster = envelope::decode(config.game, stored.as_deref());

    let stats = apply_batch(&mut roster, messages);

    let board = render::render_leaderboard(&roster);
    publisher.publish(config, &board)?;
    store.store(config, &envelope::encode(&roster))?;

    tracing::info!(
        game = config.game.label(),
        received = stats.received,
        applied = stats.applied,
        stale = stats.stale,
        rejected = stats.rejected,
        players = roster.len(),
        "Ingest run complete"
    );

    Ok(IngestReport {
        game: config.game,
        stats,
        player_count: roster.len(),
        board,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        apply_batch, run_ingest, BatchStats, BoardPublisher, ChannelConfig, InboundMessage,
        RosterStore,
    };
    use crate::envelope::ROSTER_MARKER;
    use crate::games::GameId;
    use crate::roster::Roster;

    #[derive(Default)]
    struct MemoryStore {
        envelope_text: Option<String>,
    }

    impl RosterStore for MemoryStore {
        fn load(&mut self, _config: &ChannelConfig) -> Result<Option<String>, String> {
            Ok(self.envelope_text.clone())
        }

        fn store(&mut self, _config: &ChannelConfig, envelope_text: &str) -> Result<(), String> {
            self.envelope_text = Some(envelope_text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryPublisher {
        boards: Vec<String>,
    }

    impl BoardPublisher for MemoryPublisher {
        fn publish(&mut self, _config: &ChannelConfig, board: &str) -> Result<(), String> {
            self.boards.push(board.to_string());
            Ok(())
        }
    }

    fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    fn rivals_config() -> ChannelConfig {
        ChannelConfig {
            game: GameId::MarvelRivals,
            feed_channel: "rivals-updates".to_string(),
            board_channel: "rivals-board".to_string(),
            board_message: None,
        }
    }

    fn inbound(order: u64, text: &str) -> InboundMessage {
        InboundMessage {
            text: text.to_string(),
            arrival_order: order,
        }
    }

    #[test]
    fn a_batch_splits_into_applied_stale_and_rejected() {
        let mut roster = Roster::new(GameId::MarvelRivals);

        let stats = apply_batch(
            &mut roster,
            &[
                inbound(1, "LB_UPDATE_MR: @Turbo Strategist Diamond 2 Grandmaster 1 today"),
                inbound(2, "LB_UPDATE_MR: @Turbo Strategist Platinum 1 Grandmaster 1 yesterday"),
                inbound(3, "not an update"),
                inbound(4, "LB_UPDATE_DL: @Someone Haze Oracle 4 115 today"),
            ],
        );

        assert_eq!(
            stats,
            BatchStats {
                received: 4,
                applied: 1,
                stale: 1,
                rejected: 2,
            }
        );
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.players()[0].rank_current, "Diamond");
    }

    #[test]
    fn messages_apply_in_arrival_order_not_event_order() {
        let mut roster = Roster::new(GameId::MarvelRivals);

        // The later arrival carries the later event time, so it wins even
        // though it sorts last in the input slice.
        let stats = apply_batch(
            &mut roster,
            &[
                inbound(2, "LB_UPDATE_MR: @Turbo Strategist Diamond 2 Grandmaster 1 today"),
                inbound(1, "LB_UPDATE_MR: @Turbo Strategist Gold 1 Platinum 1 yesterday"),
            ],
        );

        assert_eq!(stats.applied, 2);
        assert_eq!(roster.players()[0].rank_current, "Diamond");
    }

    #[test]
    fn run_ingest_builds_state_from_nothing_and_persists_it() {
        init_test_tracing();
        let mut store = MemoryStore::default();
        let mut publisher = MemoryPublisher::default();

        let report = run_ingest(
            &rivals_config(),
            &[inbound(1, "LB_UPDATE_MR: @Turbo Strategist Diamond 2 Grandmaster 1 today")],
            &mut store,
            &mut publisher,
        )
        .expect("Expected the ingest run to succeed");

        assert_eq!(report.stats.applied, 1);
        assert_eq!(report.player_count, 1);
        assert!(report.board.contains("1. Turbo"));
        assert_eq!(publisher.boards.len(), 1);
        assert!(store
            .envelope_text
            .as_deref()
            .expect("Expected state to be stored")
            .starts_with(ROSTER_MARKER));
    }

    #[test]
    fn a_second_run_extends_the_persisted_roster() {
        let mut store = MemoryStore::default();
        let mut publisher = MemoryPublisher::default();

        run_ingest(
            &rivals_config(),
            &[inbound(1, "LB_UPDATE_MR: @Turbo Strategist Diamond 2 Grandmaster 1 today")],
            &mut store,
            &mut publisher,
        )
        .expect("Expected the first ingest run to succeed");

        let report = run_ingest(
            &rivals_config(),
            &[inbound(1, "LB_UPDATE_MR: @Big Cat Vanguard Gold 3 Platinum 1 today")],
            &mut store,
            &mut publisher,
        )
        .expect("Expected the second ingest run to succeed");

        assert_eq!(report.player_count, 2);
        assert!(report.board.contains("Turbo"));
        assert!(report.board.contains("Big Cat"));
    }

    #[test]
    fn corrupt_stored_state_recovers_to_an_empty_roster() {
        let mut store = MemoryStore {
            envelope_text: Some(format!("{ROSTER_MARKER}{{broken")),
        };
        let mut publisher = MemoryPublisher::default();

        let report = run_ingest(
            &rivals_config(),
            &[inbound(1, "LB_UPDATE_MR: @Turbo Strategist Diamond 2 Grandmaster 1 today")],
            &mut store,
            &mut publisher,
        )
        .expect("Expected the ingest run to survive corrupt state");

        assert_eq!(report.player_count, 1);
    }

    #[test]
    fn repeated_runs_over_the_same_input_converge() {
        let mut store = MemoryStore::default();
        let mut publisher = MemoryPublisher::default();
        let batch = [inbound(
            1,
            "LB_UPDATE_MR: @Turbo Strategist Diamond 2 Grandmaster 1 March 2 2024",
        )];

        run_ingest(&rivals_config(), &batch, &mut store, &mut publisher)
            .expect("Expected the first ingest run to succeed");
        let first_state = store.envelope_text.clone();

        let report = run_ingest(&rivals_config(), &batch, &mut store, &mut publisher)
            .expect("Expected the repeated ingest run to succeed");

        assert_eq!(store.envelope_text, first_state);
        assert_eq!(report.player_count, 1);
        assert_eq!(report.stats.applied, 1);
    }
}
