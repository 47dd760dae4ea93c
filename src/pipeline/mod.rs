pub mod plan;
pub mod runner;
pub mod stage;

pub use plan::*;
pub use runner::*;
pub use stage::*;
