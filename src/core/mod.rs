pub mod history;
pub mod message;

pub use history::HistoryStore;
pub use message::{Message, Role};
