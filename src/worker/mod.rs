mod backoff;
mod poll_timeline;
mod sequencer;

pub use backoff::PollBackoff;
pub use poll_timeline::*;
pub use sequencer::{RequestSequencer, Ticket};
