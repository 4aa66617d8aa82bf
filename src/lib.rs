pub mod action;
pub mod auto;
pub mod board;
pub mod card;
pub mod error;
pub mod history;
pub mod layout;
pub mod session;
pub mod space;
pub mod stack;
pub mod validator;

pub use action::{Action, format_action, parse_action};
pub use board::Board;
pub use card::{Card, Suit};
pub use error::MoveError;
pub use session::{Input, Release, RenderPlan, Session};
pub use space::SpaceId;
