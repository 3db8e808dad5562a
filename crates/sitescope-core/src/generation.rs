//! Scene generations for discarding stale asynchronous results.
//!
//! Every geometry load starts a new [`Generation`]. Requests issued on behalf
//! of a load (climate data, map tiles, render calls) carry the generation
//! they were issued for; results arriving for an older generation are
//! dropped instead of populating the current scene.

/// Monotonically increasing tag of one geometry-load lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Returns the following generation.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A value tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub generation: Generation,
    pub value: T,
}

impl<T> Tagged<T> {
    /// Tags a value.
    pub fn new(generation: Generation, value: T) -> Self {
        Self { generation, value }
    }

    /// Unwraps the value if it belongs to `current`, discarding it otherwise.
    pub fn accept(self, current: Generation) -> Option<T> {
        if self.generation == current {
            Some(self.value)
        } else {
            log::debug!(
                "discarding result for stale generation {} (current {})",
                self.generation.value(),
                current.value()
            );
            None
        }
    }
}
