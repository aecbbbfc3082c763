//! Ordering of overlapping table loads.

use tracing::{debug, warn};

/// Handle for one started load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    node: String,
}

impl LoadTicket {
    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Hands out load tickets and recognises superseded ones.
///
/// Each selection starts a new generation. Only the result of the newest
/// generation is applied; anything that finishes later for an older
/// selection is dropped.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    current: u64,
}

impl LoadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, node: &str) -> LoadTicket {
        self.current += 1;
        debug!(node, generation = self.current, "load started");
        LoadTicket {
            generation: self.current,
            node: node.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.current
    }

    /// Pass `result` through when `ticket` is still the newest load.
    pub fn complete<T>(&self, ticket: &LoadTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            warn!(
                node = %ticket.node,
                generation = ticket.generation,
                current = self.current,
                "discarding result of superseded load"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut sequencer = LoadSequencer::new();
        let first = sequencer.begin("B1-Main Material");
        let second = sequencer.begin("B3-Grade");
        assert!(!sequencer.is_current(&first));
        assert!(sequencer.is_current(&second));
        assert_eq!(sequencer.complete(&first, 1), None);
        assert_eq!(sequencer.complete(&second, 2), Some(2));
    }

    #[test]
    fn reselecting_the_same_node_still_supersedes() {
        let mut sequencer = LoadSequencer::new();
        let first = sequencer.begin("Bend Data");
        let second = sequencer.begin("Bend Data");
        assert_ne!(first, second);
        assert_eq!(sequencer.complete(&first, ()), None);
    }
}
