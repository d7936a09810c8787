// HTTP routes
pub mod employers;
pub mod health;

pub use employers::*;
pub use health::*;
