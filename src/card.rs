use anyhow::{Context, Result};

use std::fmt;

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const SUITS: [char; 4] = ['♣', '♦', '♥', '♠'];
const ASCII_SUITS: [char; 4] = ['C', 'D', 'H', 'S'];
const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Clubs | Suit::Spades => Color::Black,
            Suit::Diamonds | Suit::Hearts => Color::Red,
        }
    }

    pub fn symbol(self) -> char {
        SUITS[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Sprite-sheet cell of a card: one row per suit, one column per rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub row: u8,
    pub column: u8,
}

/// Maps a card's asset key to whatever the renderer draws with.
pub trait AssetProvider {
    type Token;

    fn token(&self, key: AssetKey) -> Self::Token;
}

/// A playing card packed into a single byte: `suit * 13 + (rank - 1)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// Ranks outside `1..=13` are clamped into range.
    pub fn new(suit: Suit, rank: u8) -> Self {
        let rank = rank.clamp(1, MAX_RANK);
        Self(suit.index() * MAX_RANK + rank - 1)
    }

    pub fn new_with_id(id: u8) -> Option<Self> {
        (id < MAX_CARD).then_some(Self(id))
    }

    /// All 52 cards, clubs to spades, ace to king within each suit.
    pub fn new_deck() -> Vec<Card> {
        (0..MAX_CARD).map(Card).collect()
    }

    pub fn parse(rank: char, suit: char) -> Result<Self> {
        let rank_idx = RANKS
            .iter()
            .position(|&r| r == rank.to_ascii_uppercase())
            .with_context(|| format!("Invalid rank at card {rank}{suit}"))?;
        let suit_idx = SUITS
            .iter()
            .position(|&s| s == suit)
            .or_else(|| {
                ASCII_SUITS
                    .iter()
                    .position(|&s| s == suit.to_ascii_uppercase())
            })
            .with_context(|| format!("Invalid suit at card {rank}{suit}"))?;
        Ok(Self(suit_idx as u8 * MAX_RANK + rank_idx as u8))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn rank(&self) -> u8 {
        self.0 % MAX_RANK + 1
    }

    pub fn suit(&self) -> Suit {
        // id < MAX_CARD is upheld by every constructor
        Suit::ALL[(self.0 / MAX_RANK) as usize]
    }

    pub fn color(&self) -> Color {
        self.suit().color()
    }

    pub fn is_ace(&self) -> bool {
        self.rank() == 1
    }

    /// Whether `self` may be placed on a foundation whose top is `other`.
    pub fn piles_up(&self, other: Option<&Card>) -> bool {
        match other {
            None => self.is_ace(),
            Some(other) => other.suit() == self.suit() && other.rank() + 1 == self.rank(),
        }
    }

    /// Whether `self` may be placed on a tableau card `other`.
    pub fn stacks_down(&self, other: Option<&Card>) -> bool {
        match other {
            None => true,
            Some(other) => other.color() != self.color() && self.rank() + 1 == other.rank(),
        }
    }

    pub fn asset_key(&self) -> AssetKey {
        AssetKey {
            row: self.suit().index(),
            column: self.rank() - 1,
        }
    }

    pub fn asset<P: AssetProvider>(&self, provider: &P) -> P::Token {
        provider.token(self.asset_key())
    }

    pub fn pretty_print(&self) -> String {
        format!(
            "{}{}",
            RANKS[(self.rank() - 1) as usize],
            self.suit().symbol()
        )
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({})", self.pretty_print())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        let mut chars = s.chars();
        Card::parse(chars.next().unwrap(), chars.next().unwrap()).unwrap()
    }

    #[test]
    fn test_piles_up() {
        let ace_spades = card("A♠");
        let two_spades = card("2♠");
        let two_hearts = card("2♥");
        assert!(ace_spades.piles_up(None));
        assert!(!two_spades.piles_up(None));
        assert!(two_spades.piles_up(Some(&ace_spades)));
        assert!(!two_spades.piles_up(Some(&card("A♣"))));
        assert!(!two_hearts.piles_up(Some(&ace_spades)));
        assert!(!card("3♠").piles_up(Some(&ace_spades)));
    }

    #[test]
    fn test_stacks_down() {
        let red_jack = card("J♥");
        assert!(card("T♠").stacks_down(Some(&red_jack)));
        assert!(card("T♣").stacks_down(Some(&card("J♦"))));
        assert!(!card("T♦").stacks_down(Some(&red_jack)));
        assert!(!card("9♠").stacks_down(Some(&red_jack)));
        assert!(!card("Q♠").stacks_down(Some(&red_jack)));
        assert!(card("T♦").stacks_down(None));
        assert!(card("K♠").stacks_down(None));
    }

    #[test]
    fn test_card_fields() {
        let c = Card::new(Suit::Hearts, 12);
        assert_eq!(c.rank(), 12);
        assert_eq!(c.suit(), Suit::Hearts);
        assert_eq!(c.color(), Color::Red);
        assert_eq!(c.pretty_print(), "Q♥");
        assert_eq!(c, card("QH"));
        assert_eq!(c.asset_key(), AssetKey { row: 2, column: 11 });
        assert_eq!(Card::new_with_id(MAX_CARD), None);
        assert_eq!(Card::new(Suit::Spades, 0), Card::new(Suit::Spades, 1));
        assert_eq!(Card::new(Suit::Clubs, 200).rank(), MAX_RANK);
        assert_eq!(Card::new(Suit::Clubs, 200).suit(), Suit::Clubs);
    }

    struct SpriteSheet {
        cell: (u32, u32),
    }

    impl AssetProvider for SpriteSheet {
        type Token = (u32, u32);

        fn token(&self, key: AssetKey) -> (u32, u32) {
            (key.column as u32 * self.cell.0, key.row as u32 * self.cell.1)
        }
    }

    #[test]
    fn test_asset_lookup() {
        let sheet = SpriteSheet { cell: (90, 130) };
        assert_eq!(card("A♣").asset(&sheet), (0, 0));
        assert_eq!(card("K♠").asset(&sheet), (1080, 390));
        assert_eq!(card("5♦").asset_key(), AssetKey { row: 1, column: 4 });
    }

    #[test]
    fn test_new_deck() {
        let deck = Card::new_deck();
        assert_eq!(deck.len(), MAX_CARD as usize);
        assert_eq!(deck[0], Card::new(Suit::Clubs, 1));
        assert_eq!(deck[12], Card::new(Suit::Clubs, 13));
        assert_eq!(deck[51], Card::new(Suit::Spades, 13));
        let mut ids: Vec<_> = deck.iter().map(|c| c.id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), deck.len());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Card::parse('X', '♠').is_err());
        assert!(Card::parse('A', 'X').is_err());
    }
}
