pub mod error;
pub mod executor;
pub mod extract;
pub mod history;
