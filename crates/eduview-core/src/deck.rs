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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::pager::Navigate;
use crate::pager::Navigation;
use crate::pager::Pager;
use crate::types::flashcard::Flashcard;
use crate::types::flashcard::FlashcardKind;

/// Which flashcards are shown.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Question,
    Note,
    Fact,
}

impl KindFilter {
    pub const ALL: [KindFilter; 4] = [
        KindFilter::All,
        KindFilter::Question,
        KindFilter::Note,
        KindFilter::Fact,
    ];

    /// Cards of an unspecified kind are only shown under `All`.
    pub fn matches(self, card: &Flashcard) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Question => card.kind() == FlashcardKind::Question,
            KindFilter::Note => card.kind() == FlashcardKind::Note,
            KindFilter::Fact => card.kind() == FlashcardKind::Fact,
        }
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            KindFilter::All => "All",
            KindFilter::Question => "Questions",
            KindFilter::Note => "Notes",
            KindFilter::Fact => "Facts",
        }
    }
}

impl Display for KindFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KindFilter::All => write!(f, "all"),
            KindFilter::Question => write!(f, "question"),
            KindFilter::Note => write!(f, "note"),
            KindFilter::Fact => write!(f, "fact"),
        }
    }
}

impl FromStr for KindFilter {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(KindFilter::All),
            "question" | "questions" => Ok(KindFilter::Question),
            "note" | "notes" => Ok(KindFilter::Note),
            "fact" | "facts" => Ok(KindFilter::Fact),
            _ => Err(ErrorReport::new(format!("Unknown card filter: '{s}'."))),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EmptyState {
    /// The deck has no cards at all.
    NoContent,
    /// The deck has cards, but none pass the active filter.
    NoneOfKind,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoContent => "No flashcards found",
            EmptyState::NoneOfKind => "No cards of this type",
        }
    }
}

/// A list of flashcards paged through one kind at a time.
#[derive(Clone, Debug)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    filter: KindFilter,
    /// Indices into `cards` of the cards passing `filter`.
    pager: Pager<usize>,
    delay: Duration,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>, delay: Duration) -> Self {
        Self::with_filter(cards, KindFilter::All, delay)
    }

    pub fn with_filter(cards: Vec<Flashcard>, filter: KindFilter, delay: Duration) -> Self {
        let pager = Self::filtered(&cards, filter, delay);
        Self {
            cards,
            filter,
            pager,
            delay,
        }
    }

    fn filtered(cards: &[Flashcard], filter: KindFilter, delay: Duration) -> Pager<usize> {
        let indices = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| filter.matches(card))
            .map(|(idx, _)| idx)
            .collect();
        Pager::new(indices, delay)
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    /// Switch filters. The position always goes back to the first card.
    pub fn set_filter(&mut self, filter: KindFilter) {
        log::debug!("Switching card filter from {} to {filter}.", self.filter);
        self.filter = filter;
        self.pager = Self::filtered(&self.cards, filter, self.delay);
    }

    /// How many cards pass `filter`.
    pub fn count(&self, filter: KindFilter) -> usize {
        self.cards.iter().filter(|card| filter.matches(card)).count()
    }

    /// A filter with no matching cards is shown disabled.
    pub fn is_enabled(&self, filter: KindFilter) -> bool {
        self.count(filter) > 0
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.pager.current().and_then(|idx| self.cards.get(*idx))
    }

    pub fn pager(&self) -> &Pager<usize> {
        &self.pager
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.cards.is_empty() {
            Some(EmptyState::NoContent)
        } else if self.pager.is_empty() {
            Some(EmptyState::NoneOfKind)
        } else {
            None
        }
    }
}

impl Navigate for FlashcardDeck {
    fn len(&self) -> usize {
        self.pager.len()
    }

    fn position(&self) -> usize {
        self.pager.current_index()
    }

    fn go_to_next(&mut self) -> Navigation {
        self.pager.go_to_next()
    }

    fn go_to_previous(&mut self) -> Navigation {
        self.pager.go_to_previous()
    }

    fn finish_transition(&mut self) -> bool {
        self.pager.finish_transition()
    }

    fn jump_to(&mut self, index: usize) -> usize {
        self.pager.jump_to(index)
    }

    fn progress_fraction(&self) -> f64 {
        self.pager.progress_fraction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    fn card(front: &str, kind: FlashcardKind) -> Flashcard {
        Flashcard::new(front, "back", None, kind).unwrap()
    }

    fn deck() -> FlashcardDeck {
        FlashcardDeck::new(
            vec![
                card("q1", FlashcardKind::Question),
                card("n1", FlashcardKind::Note),
                card("q2", FlashcardKind::Question),
                card("q3", FlashcardKind::Question),
                card("u1", FlashcardKind::Unspecified),
            ],
            Duration::ZERO,
        )
    }

    #[test]
    fn test_filter_resets_position() {
        let mut deck = deck();
        deck.jump_to(1);
        deck.set_filter(KindFilter::Question);
        assert_eq!(deck.position(), 0);
        assert_eq!(deck.current().map(Flashcard::front), Some("q1"));
        deck.go_to_next();
        assert_eq!(deck.current().map(Flashcard::front), Some("q2"));
        deck.set_filter(KindFilter::Question);
        assert_eq!(deck.position(), 0);
    }

    #[test]
    fn test_counts_and_disabled_filters() {
        let deck = deck();
        assert_eq!(deck.count(KindFilter::All), 5);
        assert_eq!(deck.count(KindFilter::Question), 3);
        assert_eq!(deck.count(KindFilter::Note), 1);
        assert!(!deck.is_enabled(KindFilter::Fact));
    }

    #[test]
    fn test_empty_states() {
        let empty = FlashcardDeck::new(Vec::new(), Duration::ZERO);
        assert_eq!(empty.empty_state(), Some(EmptyState::NoContent));
        let mut deck = deck();
        assert_eq!(deck.empty_state(), None);
        deck.set_filter(KindFilter::Fact);
        assert_eq!(deck.empty_state(), Some(EmptyState::NoneOfKind));
        assert_eq!(deck.current(), None);
        assert_eq!(deck.progress_fraction(), 0.0);
        assert_eq!(
            EmptyState::NoneOfKind.message(),
            "No cards of this type"
        );
    }

    #[test]
    fn test_parse_filter() -> Fallible<()> {
        assert_eq!("Questions".parse::<KindFilter>()?, KindFilter::Question);
        assert_eq!("all".parse::<KindFilter>()?, KindFilter::All);
        assert!("trivia".parse::<KindFilter>().is_err());
        Ok(())
    }
}
