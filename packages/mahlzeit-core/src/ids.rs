//! Message id generation.
//!
//! Ids only need to be unique within one session incarnation, so a
//! monotonic counter is enough and keeps them collision-free even under
//! rapid successive appends.

/// Generates message ids for one session.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id. Never repeats within a session.
    pub fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("msg-{:06}", self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut ids = IdGenerator::new();

        let generated: Vec<String> = (0..1000).map(|_| ids.next_id()).collect();
        let unique: HashSet<&String> = generated.iter().collect();

        assert_eq!(unique.len(), generated.len());
        assert_eq!(generated[0], "msg-000001");
        assert!(generated.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
