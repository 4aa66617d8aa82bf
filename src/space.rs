use crate::{
    card::Card,
    error::{MoveError, Result},
    stack::{Run, Stack},
};

use std::fmt;

pub const TOTAL_FOUNDATIONS: usize = 4;
pub const TOTAL_FREE_CELLS: usize = 4;
pub const TOTAL_TABLEAUS: usize = 8;
pub const TOTAL_SPACES: usize = TOTAL_FOUNDATIONS + TOTAL_FREE_CELLS + TOTAL_TABLEAUS;

/// Address of a board location. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceId {
    Foundation(usize),
    FreeCell(usize),
    Tableau(usize),
}

impl SpaceId {
    pub fn foundations() -> impl Iterator<Item = SpaceId> {
        (0..TOTAL_FOUNDATIONS).map(SpaceId::Foundation)
    }

    pub fn free_cells() -> impl Iterator<Item = SpaceId> {
        (0..TOTAL_FREE_CELLS).map(SpaceId::FreeCell)
    }

    pub fn tableaus() -> impl Iterator<Item = SpaceId> {
        (0..TOTAL_TABLEAUS).map(SpaceId::Tableau)
    }

    pub fn all() -> impl Iterator<Item = SpaceId> {
        Self::foundations()
            .chain(Self::free_cells())
            .chain(Self::tableaus())
    }

    pub fn index(&self) -> usize {
        match *self {
            SpaceId::Foundation(i) | SpaceId::FreeCell(i) | SpaceId::Tableau(i) => i,
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            SpaceId::Foundation(i) => i < TOTAL_FOUNDATIONS,
            SpaceId::FreeCell(i) => i < TOTAL_FREE_CELLS,
            SpaceId::Tableau(i) => i < TOTAL_TABLEAUS,
        }
    }

    /// Short notation used by actions and the board text form, e.g. `T3`.
    pub fn notation(&self) -> String {
        match *self {
            SpaceId::Foundation(i) => format!("F{}", i + 1),
            SpaceId::FreeCell(i) => format!("C{}", i + 1),
            SpaceId::Tableau(i) => format!("T{}", i + 1),
        }
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SpaceId::Foundation(i) => write!(f, "foundation {}", i + 1),
            SpaceId::FreeCell(i) => write!(f, "free cell {}", i + 1),
            SpaceId::Tableau(i) => write!(f, "tableau {}", i + 1),
        }
    }
}

/// A board location and the cards it owns. The variant is carried by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    id: SpaceId,
    stack: Stack,
}

impl Space {
    pub fn new(id: SpaceId) -> Self {
        Self {
            id,
            stack: Stack::default(),
        }
    }

    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn cards(&self) -> &[Card] {
        self.stack.cards()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.stack.peek_top()
    }

    /// Whether this space holds cards temporarily, so that an empty one adds move capacity.
    pub fn is_holding_slot(&self) -> bool {
        !matches!(self.id, SpaceId::Foundation(_))
    }

    /// The run from `card` to the top of this space.
    pub fn extract_run(&self, card: &Card) -> Result<&[Card]> {
        self.stack.extract_run(card).ok_or(MoveError::NotFound {
            card: *card,
            space: self.id,
        })
    }

    /// Placement rule for `run`; `capacity` bounds the run length a column may take.
    pub fn accepts(&self, run: &[Card], capacity: usize) -> bool {
        let Some(first) = run.first() else {
            return false;
        };
        match self.id {
            SpaceId::Foundation(_) => run.len() == 1 && first.piles_up(self.top_card()),
            SpaceId::FreeCell(_) => run.len() == 1 && self.is_empty(),
            SpaceId::Tableau(_) => run.len() <= capacity && first.stacks_down(self.top_card()),
        }
    }

    pub fn add(&mut self, run: impl IntoIterator<Item = Card>) {
        self.stack.extend(run);
    }

    pub fn push(&mut self, card: Card) {
        self.stack.push(card);
    }

    /// Detaches the run starting at `card`.
    pub fn remove_run(&mut self, card: &Card) -> Result<Run> {
        let count = self.extract_run(card)?.len();
        Ok(self.stack.drain_unchecked(count))
    }

    pub fn take_top(&mut self, count: usize) -> Run {
        let count = count.min(self.stack.len());
        self.stack.drain_unchecked(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn space_with(id: SpaceId, cards: &[Card]) -> Space {
        let mut space = Space::new(id);
        space.add(cards.iter().copied());
        space
    }

    #[test]
    fn test_foundation_accepts() {
        let ace = Card::new(Suit::Spades, 1);
        let two = Card::new(Suit::Spades, 2);
        let three = Card::new(Suit::Spades, 3);
        let empty = Space::new(SpaceId::Foundation(0));
        assert!(empty.accepts(&[ace], 0));
        assert!(!empty.accepts(&[two], 13));

        let started = space_with(SpaceId::Foundation(0), &[ace]);
        assert!(started.accepts(&[two], 1));
        assert!(!started.accepts(&[Card::new(Suit::Hearts, 2)], 1));
        assert!(!started.accepts(&[two, three], 13));
    }

    #[test]
    fn test_free_cell_accepts() {
        let card = Card::new(Suit::Hearts, 9);
        let empty = Space::new(SpaceId::FreeCell(2));
        assert!(empty.accepts(&[card], 1));
        assert!(!empty.accepts(&[], 1));
        assert!(!empty.accepts(&[card, Card::new(Suit::Clubs, 8)], 4));
        let full = space_with(SpaceId::FreeCell(2), &[Card::new(Suit::Clubs, 1)]);
        assert!(!full.accepts(&[card], 1));
    }

    #[test]
    fn test_tableau_accepts() {
        let run = [Card::new(Suit::Spades, 10), Card::new(Suit::Hearts, 9)];
        let empty = Space::new(SpaceId::Tableau(0));
        assert!(empty.accepts(&run, 2));
        assert!(!empty.accepts(&run, 1));

        let red_jack = space_with(SpaceId::Tableau(1), &[Card::new(Suit::Diamonds, 11)]);
        assert!(red_jack.accepts(&run, 2));
        let black_jack = space_with(SpaceId::Tableau(1), &[Card::new(Suit::Clubs, 11)]);
        assert!(!black_jack.accepts(&run, 2));
    }

    #[test]
    fn test_remove_run() {
        let cards = [
            Card::new(Suit::Clubs, 4),
            Card::new(Suit::Spades, 10),
            Card::new(Suit::Hearts, 9),
        ];
        let mut space = space_with(SpaceId::Tableau(5), &cards);
        let run = space.remove_run(&cards[1]).unwrap();
        assert_eq!(&run[..], &cards[1..]);
        assert_eq!(space.cards(), &cards[..1]);

        let missing = Card::new(Suit::Diamonds, 1);
        assert_eq!(
            space.remove_run(&missing),
            Err(MoveError::NotFound {
                card: missing,
                space: SpaceId::Tableau(5)
            })
        );
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn test_space_ids() {
        assert_eq!(SpaceId::all().count(), TOTAL_SPACES);
        assert_eq!(SpaceId::Tableau(7).notation(), "T8");
        assert_eq!(SpaceId::FreeCell(0).to_string(), "free cell 1");
        assert!(!SpaceId::Tableau(8).is_valid());
    }
}
