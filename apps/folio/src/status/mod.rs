// Producer side of the status workflow: an in-memory board of generation
// statuses, the task wrapper that keeps it current, and the HTTP handler
// pollers talk to.

pub mod board;
pub mod handlers;
pub mod index;

pub use board::{track_generation, StatusBoard, StatusEntry};
pub use index::{KnownPortfolios, NoPortfolios, PortfolioIndex};
