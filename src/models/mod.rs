pub mod document;
pub mod run;

pub use document::*;
pub use run::*;
