//! One-click-per-tick token.
//!
//! Overlapping hit regions can report the same physical click more than
//! once, and the release that ends a drag is immediately followed by a click
//! on the same die. Both are collapsed by holding this guard until the next
//! frame.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClickGuard {
    held: bool,
}

impl ClickGuard {
    /// Block clicks for the rest of the current tick.
    pub fn engage(&mut self) {
        self.held = true;
    }

    /// Take the guard for a click. Succeeds at most once per tick and never
    /// after `engage`.
    pub fn try_claim(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        true
    }

    /// Called once per frame, after input handling.
    pub fn advance(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}
