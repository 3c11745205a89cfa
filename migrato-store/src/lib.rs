#![forbid(unsafe_code)]

mod catalog;
mod error;
mod history;

pub use catalog::*;
pub use error::*;
pub use history::*;
