use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued fetch. Only the most recently issued ticket of the current
/// generation may publish its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    generation: AtomicU64,
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> Ticket {
        let generation = self.generation.load(Ordering::SeqCst);
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { generation, seq }
    }

    /// Invalidates every ticket issued so far.
    pub fn supersede(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation.load(Ordering::SeqCst)
            && ticket.seq == self.issued.load(Ordering::SeqCst)
    }
}
