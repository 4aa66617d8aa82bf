use crate::{card::Card, space::SpaceId};

use smallvec::SmallVec;

pub const STACK_SIZE: usize = 19;
pub const RUN_SIZE: usize = 13;

pub type Run = SmallVec<[Card; RUN_SIZE]>;

/// Whether `cards` can be lifted together: every card stacks down on the one beneath it.
pub fn is_valid_run(cards: &[Card]) -> bool {
    match cards.len() {
        0 => false,
        1 => true,
        _ => cards
            .windows(2)
            .all(|pair| pair[1].stacks_down(Some(&pair[0]))),
    }
}

/// Cards owned by a space, bottom to top. A freshly dealt stack need not be a valid run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    cards: SmallVec<[Card; STACK_SIZE]>,
}

impl Stack {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn position(&self, card: &Card) -> Option<usize> {
        self.cards.iter().position(|c| c == card)
    }

    /// The contiguous run from `card` up to the top, if `card` is here.
    pub fn extract_run(&self, card: &Card) -> Option<&[Card]> {
        self.position(card).map(|idx| &self.cards[idx..])
    }

    /// The longest valid run ending at the top card.
    pub fn top_run(&self) -> &[Card] {
        let mut start = self.cards.len();
        while start > 0 && is_valid_run(&self.cards[start - 1..]) {
            start -= 1;
        }
        &self.cards[start..]
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    pub fn drain_unchecked(&mut self, count: usize) -> Run {
        let len = self.cards.len();
        self.cards.drain(len - count..).collect()
    }
}

/// A validated run lifted off its source space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveStack {
    cards: Run,
    source: SpaceId,
}

impl MoveStack {
    /// Returns `None` when `cards` is not a valid run.
    pub fn new(source: SpaceId, cards: &[Card]) -> Option<Self> {
        is_valid_run(cards).then(|| Self {
            cards: cards.iter().copied().collect(),
            source,
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn source(&self) -> SpaceId {
        self.source
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Offset of each card relative to the bottom card when fanned by `fan_offset`.
    pub fn offsets(&self, fan_offset: i32) -> impl Iterator<Item = (Card, i32)> + '_ {
        self.cards
            .iter()
            .enumerate()
            .map(move |(i, &card)| (card, i as i32 * fan_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        chars
            .chunks(2)
            .map(|pair| Card::parse(pair[0], pair[1]).unwrap())
            .collect()
    }

    #[test]
    fn test_is_valid_run() {
        assert!(!is_valid_run(&[]));
        assert!(is_valid_run(&cards("5♣")));
        assert!(is_valid_run(&cards("K♠Q♥J♣T♦")));
        assert!(!is_valid_run(&cards("K♠Q♠")));
        assert!(!is_valid_run(&cards("K♠J♥")));
        assert!(!is_valid_run(&cards("Q♥K♠")));
    }

    #[test]
    fn test_extract_run() {
        let stack = Stack::new(cards("2♦9♣8♥7♠"));
        let nine = cards("9♣")[0];
        assert_eq!(stack.extract_run(&nine), Some(&cards("9♣8♥7♠")[..]));
        assert_eq!(stack.extract_run(&cards("A♠")[0]), None);
        assert_eq!(stack.top_run(), &cards("9♣8♥7♠")[..]);
        assert_eq!(Stack::default().top_run(), &[] as &[Card]);
    }

    #[test]
    fn test_drain_unchecked() {
        let mut stack = Stack::new(cards("2♦9♣8♥7♠"));
        let run = stack.drain_unchecked(2);
        assert_eq!(&run[..], &cards("8♥7♠")[..]);
        assert_eq!(stack.cards(), &cards("2♦9♣")[..]);
        assert_eq!(stack.peek_top(), Some(&cards("9♣")[0]));
    }

    #[test]
    fn test_move_stack() {
        let source = SpaceId::Tableau(3);
        assert!(MoveStack::new(source, &cards("9♣9♥")).is_none());
        assert!(MoveStack::new(source, &[]).is_none());

        let held = MoveStack::new(source, &cards("9♣8♥7♠")).unwrap();
        assert_eq!(held.source(), source);
        assert_eq!(held.len(), 3);
        let offsets: Vec<i32> = held.offsets(25).map(|(_, dy)| dy).collect();
        assert_eq!(offsets, vec![0, 25, 50]);
    }
}
