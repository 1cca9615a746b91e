//! Session-scoped identifier generation.
//!
//! Composed players and wrappers need an identifier to label the signals they
//! relay. Hosts that do not name them get one from an [`IdGenerator`] owned
//! by the composition session.

use std::collections::HashSet;

/// Produces `prefix`, `prefix1`, `prefix2`, ... skipping reserved ids.
///
/// ```rust
/// use core_sequencer::ids::IdGenerator;
///
/// let mut ids = IdGenerator::new("media");
/// ids.reserve("media1");
/// assert_eq!(ids.next_id(), "media");
/// assert_eq!(ids.next_id(), "media2");
/// ```
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    counter: u64,
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
            taken: HashSet::new(),
        }
    }

    /// Mark an id as used. Returns `false` if it was already taken.
    pub fn reserve(&mut self, id: impl Into<String>) -> bool {
        self.taken.insert(id.into())
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Next free id with this generator's prefix.
    pub fn next_id(&mut self) -> String {
        loop {
            let candidate = match self.counter {
                0 => self.prefix.clone(),
                n => format!("{}{}", self.prefix, n),
            };
            self.counter += 1;

            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("id")
    }
}
