//! Operator-facing state: the latest device snapshot merged with local UI
//! state, plus routing of operator commands.

mod state;
pub use state::*;

mod holder;
pub use holder::*;
