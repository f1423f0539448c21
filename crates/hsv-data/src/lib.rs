pub mod loaders;
pub mod sources;

pub use loaders::*;
pub use sources::*;
