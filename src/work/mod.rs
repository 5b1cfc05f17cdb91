//! Work records and work page parsing.

pub mod item;
pub mod parser;

pub use item::{Artist, Page, Work, WorkType};
pub use parser::{parse_artist, parse_work, ParsedWork};
