// core.rs splits the engine into one submodule per phase.
pub mod chain;
pub mod pipeline;
pub mod selection;
pub mod state;
pub mod tree;
pub mod validation;

pub use chain::*;
pub use pipeline::*;
pub use selection::*;
pub use state::*;
pub use tree::*;
pub use validation::*;
