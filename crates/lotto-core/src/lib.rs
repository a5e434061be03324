//! Settlement engine for the `mega_6_45` and `power_6_55` lottery games.
//!
//! Pure and synchronous: validating number sets against game rules, ranking
//! prize categories, matching tickets against published drawings, and drawing
//! winning numbers on behalf of the authority.

pub mod draw;
pub mod game;
pub mod model;
pub mod prize;
pub mod settle;
pub mod validate;

pub use draw::{DrawGenerator, DrawnNumbers};
pub use game::{BonusRule, GameRules, GameType};
pub use model::{Drawing, DrawingResult, PrizeCategory, Ticket};
pub use prize::{TierError, check_tiers, default_categories, precedence, sort_by_precedence};
pub use settle::{PrizeTally, SettleError, Side, select_category, settle, settle_all};
pub use validate::{ValidationError, ValidationErrors, validate, validate_drawing, validate_ticket};
