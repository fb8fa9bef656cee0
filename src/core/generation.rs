use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket identifying one request of a given operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic counter; only the most recently issued ticket is current.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let generation = RequestGeneration::new();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_tickets_are_distinct() {
        let generation = RequestGeneration::new();
        let tickets: Vec<Ticket> = (0..4).map(|_| generation.begin()).collect();
        for (i, a) in tickets.iter().enumerate() {
            for b in &tickets[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
