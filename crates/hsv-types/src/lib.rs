pub mod config;
pub mod errors;
pub mod series;

pub use config::*;
pub use errors::*;
pub use series::*;
