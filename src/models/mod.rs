pub mod card;
pub mod market;
pub mod report;
pub mod trade;

pub use card::*;
pub use market::*;
pub use report::*;
pub use trade::*;
