mod envelope;
mod event_time;
mod games;
mod ingest;
mod message;
mod ranking;
mod render;
mod roster;

pub use envelope::{decode, encode, ROSTER_MARKER};
pub use event_time::parse_event_time;
pub use games::{GameId, RankVocabulary};
pub use ingest::{
    apply_batch, run_ingest, BatchStats, BoardPublisher, ChannelConfig, InboundMessage,
    IngestReport, RosterStore,
};
pub use message::{parse_update_message, PlayerUpdate};
pub use ranking::{comparator_for, ranked};
pub use render::render_leaderboard;
pub use roster::{PlayerRecord, Roster};
