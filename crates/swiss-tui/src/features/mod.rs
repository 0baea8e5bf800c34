pub mod search;
pub mod standings;
