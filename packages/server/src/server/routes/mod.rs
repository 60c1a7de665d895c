// HTTP routes
pub mod health;
pub mod report;

pub use health::*;
pub use report::*;
