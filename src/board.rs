use crate::{
    card::{Card, MAX_CARD, Suit},
    history::MoveRecord,
    space::{Space, SpaceId, TOTAL_FOUNDATIONS, TOTAL_FREE_CELLS, TOTAL_TABLEAUS},
};

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub foundations: [Space; TOTAL_FOUNDATIONS],
    pub free_cells: [Space; TOTAL_FREE_CELLS],
    pub tableaus: [Space; TOTAL_TABLEAUS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            foundations: std::array::from_fn(|i| Space::new(SpaceId::Foundation(i))),
            free_cells: std::array::from_fn(|i| Space::new(SpaceId::FreeCell(i))),
            tableaus: std::array::from_fn(|i| Space::new(SpaceId::Tableau(i))),
        }
    }

    /// Reproduces the classic numbered deals (game #1 opens with J♦ 2♦ 9♥ J♣ ...).
    pub fn new_from_seed(seed: u32) -> Self {
        let mut current_seed = seed;
        let mut rnd = || {
            current_seed = current_seed.wrapping_mul(214013).wrapping_add(2531011) & 0x7fffffff;
            current_seed >> 16
        };
        let mut deck: Vec<Card> = (0..MAX_CARD)
            .map(|i| Card::new(Suit::ALL[(i % 4) as usize], i / 4 + 1))
            .collect();

        let mut dealt = Vec::with_capacity(deck.len());
        while !deck.is_empty() {
            let k = rnd() as usize % deck.len();
            let last = deck.len() - 1;
            deck.swap(k, last);
            dealt.extend(deck.pop());
        }

        Self::deal(dealt)
    }

    /// Deals row by row onto the tableau: columns 0-3 get 7 cards, columns 4-7 get 6.
    pub fn deal(deck: impl IntoIterator<Item = Card>) -> Self {
        let mut board = Board::new();
        for (i, card) in deck.into_iter().enumerate() {
            board.tableaus[i % TOTAL_TABLEAUS].push(card);
        }
        board
    }

    pub fn space(&self, id: SpaceId) -> &Space {
        match id {
            SpaceId::Foundation(i) => &self.foundations[i],
            SpaceId::FreeCell(i) => &self.free_cells[i],
            SpaceId::Tableau(i) => &self.tableaus[i],
        }
    }

    pub fn space_mut(&mut self, id: SpaceId) -> &mut Space {
        match id {
            SpaceId::Foundation(i) => &mut self.foundations[i],
            SpaceId::FreeCell(i) => &mut self.free_cells[i],
            SpaceId::Tableau(i) => &mut self.tableaus[i],
        }
    }

    pub fn spaces(&self) -> impl Iterator<Item = &Space> {
        self.foundations
            .iter()
            .chain(self.free_cells.iter())
            .chain(self.tableaus.iter())
    }

    /// Empty free cells plus empty tableau columns. Foundations never count.
    pub fn empty_space_count(&self) -> usize {
        self.free_cells
            .iter()
            .chain(self.tableaus.iter())
            .filter(|space| space.is_empty())
            .count()
    }

    pub fn foundation_score(&self) -> usize {
        self.foundations.iter().map(|f| f.len()).sum()
    }

    /// Every holding space is empty, which for a valid board means every card is home.
    pub fn is_won(&self) -> bool {
        self.empty_space_count() == TOTAL_FREE_CELLS + TOTAL_TABLEAUS
    }

    /// Moves the top `count` cards of `source` onto `dest` without checking any rule.
    pub fn commit_move(&mut self, source: SpaceId, dest: SpaceId, count: usize) -> MoveRecord {
        let cards = self.space_mut(source).take_top(count);
        if cards.len() != count {
            warn!("{source} holds fewer than {count} cards; moved {}", cards.len());
        }
        self.space_mut(dest).add(cards.iter().copied());
        debug!(
            "moved {} from {source} to {dest}",
            cards
                .iter()
                .map(|c| c.pretty_print())
                .collect::<Vec<_>>()
                .join("")
        );
        MoveRecord::new(cards, source, dest)
    }

    /// Reverses a committed move, putting its cards back on the source.
    pub fn revert_move(&mut self, record: &MoveRecord) {
        let cards = self.space_mut(record.dest).take_top(record.cards.len());
        debug_assert_eq!(&cards[..], &record.cards[..], "undo out of sync with board");
        self.space_mut(record.source).add(cards);
        debug!("undid move from {} to {}", record.source, record.dest);
    }

    /// Checks the 52-card invariant: every card exactly once.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; MAX_CARD as usize];
        let mut count = 0;
        for card in self.spaces().flat_map(|space| space.cards()) {
            let id = card.id() as usize;
            if seen[id] {
                return false;
            }
            seen[id] = true;
            count += 1;
        }
        count == MAX_CARD as usize
    }

    /// Like [`Board::parse`], but the board must hold each of the 52 cards exactly once.
    pub fn parse_full(content: &str) -> Result<Self> {
        let board = Self::parse(content)?;
        if !board.is_valid() {
            bail!("Invalid board; every card must appear exactly once");
        }
        Ok(board)
    }

    /// Parses the text form. Any subset of the deck is accepted, which is handy for
    /// positions that only matter in part.
    pub fn parse(content: &str) -> Result<Self> {
        let mut board = Self::new();
        let mut named = HashSet::new();

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            if let Some(rest) = line.strip_prefix("Foundation") {
                let (idx, cards) = Self::parse_space_line(rest, TOTAL_FOUNDATIONS, "foundation")
                    .with_context(line_context)?;
                if !named.insert(SpaceId::Foundation(idx)) {
                    bail!("Foundation{} is listed twice", idx + 1);
                }
                if let Some(top_card) = cards.last() {
                    for rank in 1..=top_card.rank() {
                        board.foundations[idx].push(Card::new(top_card.suit(), rank));
                    }
                }
            } else if let Some(rest) = line.strip_prefix("Cell") {
                let (idx, cards) = Self::parse_space_line(rest, TOTAL_FREE_CELLS, "free cell")
                    .with_context(line_context)?;
                if !named.insert(SpaceId::FreeCell(idx)) {
                    bail!("Cell{} is listed twice", idx + 1);
                }
                if cards.len() > 1 {
                    bail!("A free cell holds at most one card; {}", line_context());
                }
                board.free_cells[idx].add(cards);
            } else if let Some(rest) = line.strip_prefix("Tableau") {
                let (idx, cards) = Self::parse_space_line(rest, TOTAL_TABLEAUS, "tableau")
                    .with_context(line_context)?;
                if !named.insert(SpaceId::Tableau(idx)) {
                    bail!("Tableau{} is listed twice", idx + 1);
                }
                board.tableaus[idx].add(cards);
            } else {
                bail!("Unknown line '{line}'");
            }
        }

        Ok(board)
    }

    fn parse_space_line(rest: &str, total: usize, name: &str) -> Result<(usize, Vec<Card>)> {
        let mut parts = rest.splitn(2, ':');
        let idx = parts
            .next()
            .unwrap_or("")
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid {name} index"))?;
        if idx == 0 || idx > total {
            bail!("The {name} index must be between 1 and {total}");
        }
        let cards = Self::parse_cards(parts.next().unwrap_or("").trim())?;
        Ok((idx - 1, cards))
    }

    pub(crate) fn parse_cards(s: &str) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(&c1) = chars.peek() {
            if c1.is_whitespace() {
                chars.next();
                continue;
            }
            let rank = c1;
            chars.next();
            let suit = match chars.next() {
                Some(s) => s,
                None => bail!("Missing suit after rank '{rank}'"),
            };
            cards.push(Card::parse(rank, suit)?);
        }
        Ok(cards)
    }

    pub fn pretty_print(&self) -> String {
        let mut lines = Vec::new();

        for (i, foundation) in self.foundations.iter().enumerate() {
            if let Some(card) = foundation.top_card() {
                lines.push(format!("Foundation{}: {}", i + 1, card.pretty_print()));
            }
        }

        for (i, cell) in self.free_cells.iter().enumerate() {
            if let Some(card) = cell.top_card() {
                lines.push(format!("Cell{}: {}", i + 1, card.pretty_print()));
            }
        }

        for (i, tableau) in self.tableaus.iter().enumerate() {
            if tableau.is_empty() {
                continue;
            }
            let cards: String = tableau.cards().iter().map(|c| c.pretty_print()).collect();
            lines.push(format!("Tableau{}: {cards}", i + 1));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::MAX_RANK;

    const BOARD_STR: &str = r#"Foundation1: 2♣
Foundation3: A♥
Cell2: K♦
Cell4: 9♠
Tableau1: 5♦2♥8♦K♣7♥J♣
Tableau2: 7♦Q♥K♥T♦6♣9♥
Tableau3: J♠T♣Q♣3♣2♦Q♦8♥6♥
Tableau4: 7♠8♠5♣J♥6♠T♠
Tableau5: 5♥Q♠9♣T♥2♠
Tableau6: 7♣4♥3♠A♦3♥3♦
Tableau7: 4♣5♠4♦8♣6♦4♠
Tableau8: A♠9♦K♠J♦"#;

    #[test]
    fn test_parse_board() {
        let board = Board::parse(BOARD_STR).unwrap();
        assert!(board.is_valid());
        assert_eq!(board.foundations[0].len(), 2);
        assert_eq!(board.free_cells[1].top_card(), Some(&Card::new(Suit::Diamonds, 13)));
        assert_eq!(board.empty_space_count(), 2);
        assert_eq!(BOARD_STR, board.pretty_print());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Board::parse("Tableau9: A♠").is_err());
        assert!(Board::parse("Tableau0: A♠").is_err());
        assert!(Board::parse("Cell1: A♠2♠").is_err());
        assert!(Board::parse("Stock: A♠").is_err());
        assert!(Board::parse("Tableau1: A").is_err());
        assert!(Board::parse("Cell1: A♠\nCell1: 2♠").is_err());
        assert!(Board::parse("Tableau3: A♠\nTableau3: 2♠").is_err());
        assert!(Board::parse("Foundation2: A♥\nFoundation2: 2♥").is_err());
    }

    #[test]
    fn test_parse_full() {
        let board = Board::parse_full(BOARD_STR).unwrap();
        assert_eq!(board, Board::parse(BOARD_STR).unwrap());

        // 13 cards would otherwise count as a won game once the king goes home
        let partial = "Foundation1: Q♣\nTableau1: K♣";
        assert!(Board::parse(partial).is_ok());
        assert!(Board::parse_full(partial).is_err());

        let duplicated = BOARD_STR.replace("Tableau8: A♠9♦K♠J♦", "Tableau8: A♠9♦K♠J♦K♦");
        assert!(Board::parse(&duplicated).is_ok());
        assert!(Board::parse_full(&duplicated).is_err());
        assert!(Board::parse_full(&Board::new_from_seed(617).pretty_print()).is_ok());
    }

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.foundation_score(), 0);
        assert_eq!(board.empty_space_count(), 12);
        assert!(!board.is_valid());
        // all holding spaces are empty, though the invariant does not hold
        assert!(board.is_won());
    }

    #[test]
    fn test_deal_layout() {
        let deck = Card::new_deck();
        let board = Board::deal(deck.iter().copied());
        assert!(board.is_valid());
        let lens: Vec<usize> = board.tableaus.iter().map(|t| t.len()).collect();
        assert_eq!(lens, vec![7, 7, 7, 7, 6, 6, 6, 6]);
        assert_eq!(board.tableaus[0].cards()[0], deck[0]);
        assert_eq!(board.tableaus[1].cards()[0], deck[1]);
        assert_eq!(board.tableaus[0].cards()[1], deck[8]);
        assert!(board.free_cells.iter().all(|c| c.is_empty()));
        assert!(board.foundations.iter().all(|f| f.is_empty()));
        assert!(!board.is_won());
    }

    #[test]
    fn test_new_from_seed() {
        let board = Board::new_from_seed(1);
        assert!(board.is_valid());
        let first_row: String = board
            .tableaus
            .iter()
            .map(|t| t.cards()[0].pretty_print())
            .collect();
        assert_eq!(first_row, "J♦2♦9♥J♣5♦7♥7♣5♥");
        assert_eq!(Board::new_from_seed(1), board);
        assert_ne!(Board::new_from_seed(2), board);
    }

    #[test]
    fn test_commit_and_revert() {
        let mut board = Board::parse(BOARD_STR).unwrap();
        let before = board.clone();
        let record = board.commit_move(SpaceId::Tableau(3), SpaceId::Tableau(1), 1);
        assert_eq!(board.tableaus[1].top_card(), Some(&Card::new(Suit::Spades, 10)));
        assert_eq!(board.tableaus[3].len(), 5);
        assert!(board.is_valid());

        board.revert_move(&record);
        assert_eq!(board, before);
    }

    #[test]
    fn test_is_won() {
        let mut board = Board::new();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            for rank in 1..=MAX_RANK {
                board.foundations[i].push(Card::new(suit, rank));
            }
        }
        assert!(board.is_valid());
        assert!(board.is_won());

        board.commit_move(SpaceId::Foundation(2), SpaceId::FreeCell(0), 1);
        assert!(board.is_valid());
        assert!(!board.is_won());
    }
}
