// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! One-at-a-time paging over an ordered list of records.
//!
//! Moving to a neighbouring record goes through a transition: the pager
//! records the target, the host waits for its visual transition to end and
//! then calls [`Pager::finish_transition`]. Requests made while a
//! transition is pending are dropped.

use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Settled,
    Transitioning { target: usize },
}

/// The outcome of a navigation request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Navigation {
    /// Out of range, or a transition was already pending.
    Ignored,
    /// The current index changed.
    Moved,
    /// A transition started. The host must call `finish_transition` once
    /// the delay has elapsed.
    Pending(Duration),
}

/// The keys a viewer responds to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
}

impl NavKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(NavKey::ArrowLeft),
            "ArrowRight" | "Right" => Some(NavKey::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pager<T> {
    items: Vec<T>,
    current: usize,
    phase: Phase,
    delay: Duration,
}

impl<T> Pager<T> {
    pub fn new(items: Vec<T>, delay: Duration) -> Self {
        Self {
            items,
            current: 0,
            phase: Phase::Settled,
            delay,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.current)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.items.len()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 0
    }

    pub fn go_to_next(&mut self) -> Navigation {
        self.request(self.current.checked_add(1))
    }

    pub fn go_to_previous(&mut self) -> Navigation {
        self.request(self.current.checked_sub(1))
    }

    fn request(&mut self, target: Option<usize>) -> Navigation {
        if self.phase != Phase::Settled {
            return Navigation::Ignored;
        }
        let Some(target) = target.filter(|target| *target < self.items.len()) else {
            return Navigation::Ignored;
        };
        if self.delay.is_zero() {
            self.current = target;
            Navigation::Moved
        } else {
            self.phase = Phase::Transitioning { target };
            Navigation::Pending(self.delay)
        }
    }

    /// Apply a pending move. Returns whether the index changed.
    pub fn finish_transition(&mut self) -> bool {
        match self.phase {
            Phase::Settled => false,
            Phase::Transitioning { target } => {
                self.phase = Phase::Settled;
                // The target was in range when requested and the items
                // cannot change in between.
                self.current = target.min(self.items.len().saturating_sub(1));
                true
            }
        }
    }

    /// Move straight to `index`, clamped into range. Cancels any pending
    /// transition.
    pub fn jump_to(&mut self, index: usize) -> usize {
        self.phase = Phase::Settled;
        self.current = index.min(self.items.len().saturating_sub(1));
        self.current
    }

    pub fn progress_fraction(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            (self.current + 1) as f64 / self.items.len() as f64
        }
    }

    pub fn handle_key(&mut self, key: NavKey) -> Navigation {
        match key {
            NavKey::ArrowLeft => self.go_to_previous(),
            NavKey::ArrowRight => self.go_to_next(),
        }
    }
}

/// Navigation over any pager, for hosts that hold viewers of different
/// record types.
pub trait Navigate {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn position(&self) -> usize;

    fn go_to_next(&mut self) -> Navigation;

    fn go_to_previous(&mut self) -> Navigation;

    fn finish_transition(&mut self) -> bool;

    fn jump_to(&mut self, index: usize) -> usize;

    fn progress_fraction(&self) -> f64;

    fn handle_key(&mut self, key: NavKey) -> Navigation {
        match key {
            NavKey::ArrowLeft => self.go_to_previous(),
            NavKey::ArrowRight => self.go_to_next(),
        }
    }
}

impl<T> Navigate for Pager<T> {
    fn len(&self) -> usize {
        Pager::len(self)
    }

    fn position(&self) -> usize {
        self.current
    }

    fn go_to_next(&mut self) -> Navigation {
        Pager::go_to_next(self)
    }

    fn go_to_previous(&mut self) -> Navigation {
        Pager::go_to_previous(self)
    }

    fn finish_transition(&mut self) -> bool {
        Pager::finish_transition(self)
    }

    fn jump_to(&mut self, index: usize) -> usize {
        Pager::jump_to(self, index)
    }

    fn progress_fraction(&self) -> f64 {
        Pager::progress_fraction(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(len: usize) -> Pager<usize> {
        Pager::new((0..len).collect(), Duration::ZERO)
    }

    #[test]
    fn test_next_stops_at_last() {
        let mut pager = instant(3);
        for _ in 0..10 {
            pager.go_to_next();
        }
        assert_eq!(pager.current_index(), 2);
        assert_eq!(pager.go_to_next(), Navigation::Ignored);
    }

    #[test]
    fn test_previous_stops_at_first() {
        let mut pager = instant(3);
        pager.jump_to(2);
        for _ in 0..10 {
            pager.go_to_previous();
        }
        assert_eq!(pager.current_index(), 0);
        assert_eq!(pager.go_to_previous(), Navigation::Ignored);
    }

    #[test]
    fn test_empty_pager() {
        let mut pager = instant(0);
        assert_eq!(pager.go_to_next(), Navigation::Ignored);
        assert_eq!(pager.go_to_previous(), Navigation::Ignored);
        assert_eq!(pager.jump_to(5), 0);
        assert_eq!(pager.current(), None);
        assert_eq!(pager.progress_fraction(), 0.0);
    }

    #[test]
    fn test_progress_fraction() {
        let mut pager = instant(4);
        assert_eq!(pager.progress_fraction(), 0.25);
        let mut last = pager.progress_fraction();
        while pager.go_to_next() == Navigation::Moved {
            assert!(pager.progress_fraction() >= last);
            last = pager.progress_fraction();
        }
        assert_eq!(pager.progress_fraction(), 1.0);
    }

    #[test]
    fn test_single_item_is_complete() {
        assert_eq!(instant(1).progress_fraction(), 1.0);
    }

    #[test]
    fn test_transition_drops_requests() {
        let delay = Duration::from_millis(300);
        let mut pager = Pager::new(vec!['a', 'b', 'c'], delay);
        assert_eq!(pager.go_to_next(), Navigation::Pending(delay));
        assert_eq!(pager.phase(), Phase::Transitioning { target: 1 });
        assert_eq!(pager.current(), Some(&'a'));
        assert_eq!(pager.go_to_next(), Navigation::Ignored);
        assert_eq!(pager.go_to_previous(), Navigation::Ignored);
        assert!(pager.finish_transition());
        assert_eq!(pager.current(), Some(&'b'));
        assert_eq!(pager.phase(), Phase::Settled);
        assert!(!pager.finish_transition());
    }

    #[test]
    fn test_jump_clamps_and_settles() {
        let mut pager = Pager::new(vec![1, 2, 3], Duration::from_millis(300));
        pager.go_to_next();
        assert_eq!(pager.jump_to(99), 2);
        assert_eq!(pager.phase(), Phase::Settled);
    }

    #[test]
    fn test_keys() {
        assert_eq!(NavKey::from_key_name("ArrowLeft"), Some(NavKey::ArrowLeft));
        assert_eq!(NavKey::from_key_name("ArrowRight"), Some(NavKey::ArrowRight));
        assert_eq!(NavKey::from_key_name("Enter"), None);
        let mut pager = instant(2);
        assert_eq!(pager.handle_key(NavKey::ArrowRight), Navigation::Moved);
        assert_eq!(pager.current_index(), 1);
        assert_eq!(pager.handle_key(NavKey::ArrowLeft), Navigation::Moved);
        assert_eq!(pager.current_index(), 0);
    }

    #[test]
    fn test_navigate_trait_object() {
        let mut pagers: Vec<Box<dyn Navigate>> = vec![
            Box::new(instant(2)),
            Box::new(Pager::new(vec!["x"], Duration::ZERO)),
        ];
        for pager in &mut pagers {
            pager.handle_key(NavKey::ArrowRight);
        }
        assert_eq!(pagers[0].position(), 1);
        assert_eq!(pagers[1].position(), 0);
    }
}
