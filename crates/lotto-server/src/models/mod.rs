pub mod drawing;
pub mod drawing_result;
pub mod prize_category;
pub mod schema;
pub mod tickets;
pub mod user;

pub use drawing::{Drawing, DrawingView};
pub use drawing_result::{DrawingResult, DrawingResultView};
pub use prize_category::PrizeCategory;
pub use tickets::{Ticket, TicketView};
pub use user::{User, UserError};
