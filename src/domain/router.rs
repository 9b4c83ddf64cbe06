//! Input routing
//!
//! Routes a continuous input stream to one owner. The first source to
//! press down captures the router; events from any other source are
//! dropped until the capture is released.

use super::gesture::InputSource;

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    owner: Option<InputSource>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the stream for `source`; succeeds if free or already held by it
    pub fn capture(&mut self, source: InputSource) -> bool {
        match self.owner {
            None => {
                self.owner = Some(source);
                true
            }
            Some(owner) => owner == source,
        }
    }

    /// Returns true if events from `source` should be delivered
    pub fn accepts(&self, source: InputSource) -> bool {
        self.owner == Some(source)
    }

    /// Releases the capture if `source` holds it
    pub fn release(&mut self, source: InputSource) -> bool {
        if self.accepts(source) {
            self.owner = None;
            true
        } else {
            false
        }
    }

    pub fn owner(&self) -> Option<InputSource> {
        self.owner
    }

    /// Drops any capture unconditionally
    pub fn clear(&mut self) {
        self.owner = None;
    }
}
