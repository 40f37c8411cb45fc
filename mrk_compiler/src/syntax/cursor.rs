//! Token cursor with skip targets
//!
//! A skip target is a token position that a single forward step never
//! lands on: stepping onto it moves one position further. Declaration
//! handlers register each claimed scope's closing brace so the driver does
//! not dispatch it again. Skipping is only active once the scope table for
//! the source has been built.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Cursor {
    /// `None` before the first token
    position: Option<usize>,
    len: usize,
    skip_targets: BTreeSet<usize>,
    skipping: bool,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self {
            position: None,
            len,
            skip_targets: BTreeSet::new(),
            skipping: false,
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Position of the token under the cursor, if any
    pub fn current(&self) -> Option<usize> {
        self.position.filter(|&p| p < self.len)
    }

    /// Move to the first token
    pub fn reset(&mut self) {
        self.position = Some(0);
    }

    pub fn enable_skipping(&mut self) {
        self.skipping = true;
    }

    pub fn is_skipping(&self) -> bool {
        self.skipping
    }

    pub fn register_skip_target(&mut self, position: usize) {
        self.skip_targets.insert(position);
    }

    pub fn is_skip_target(&self, position: usize) -> bool {
        self.skip_targets.contains(&position)
    }

    /// Step forward once, passing over a skip target.
    ///
    /// Returns the new position, or `None` without moving when the step
    /// would leave the token sequence.
    pub fn advance(&mut self) -> Option<usize> {
        let mut next = self.position.map_or(0, |p| p + 1);
        if self.skipping && self.skip_targets.contains(&next) {
            next += 1;
        }
        if next >= self.len {
            return None;
        }
        self.position = Some(next);
        Some(next)
    }

    /// Place the cursor directly; skip targets do not apply
    pub fn jump_to(&mut self, position: usize) {
        self.position = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_before_first_token() {
        let mut cursor = Cursor::new(3);
        assert_eq!(cursor.position(), None);
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.advance(), Some(0));
    }

    #[test]
    fn test_advance_stops_at_end_without_moving() {
        let mut cursor = Cursor::new(2);
        cursor.reset();
        assert_eq!(cursor.advance(), Some(1));
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position(), Some(1));
    }

    #[test]
    fn test_skip_target_takes_one_extra_step() {
        let mut cursor = Cursor::new(6);
        cursor.reset();
        cursor.register_skip_target(2);
        cursor.register_skip_target(3);

        // Not active until enabled
        assert_eq!(cursor.advance(), Some(1));
        cursor.jump_to(0);
        cursor.enable_skipping();

        assert_eq!(cursor.advance(), Some(1));
        // Lands on 2, which is a target: exactly one extra step, even though
        // 3 is also a target
        assert_eq!(cursor.advance(), Some(3));
        assert_eq!(cursor.advance(), Some(4));
    }

    #[test]
    fn test_skip_past_end() {
        let mut cursor = Cursor::new(3);
        cursor.enable_skipping();
        cursor.register_skip_target(2);
        cursor.jump_to(1);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position(), Some(1));
    }

    #[test]
    fn test_jump_ignores_skip_targets() {
        let mut cursor = Cursor::new(5);
        cursor.enable_skipping();
        cursor.register_skip_target(3);
        cursor.jump_to(3);
        assert_eq!(cursor.current(), Some(3));
        assert!(cursor.is_skip_target(3));
    }

    #[test]
    fn test_empty_sequence() {
        let mut cursor = Cursor::new(0);
        cursor.reset();
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.advance(), None);
    }
}
