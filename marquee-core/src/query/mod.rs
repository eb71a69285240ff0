pub mod state;
pub mod types;

pub use state::QueryState;
pub use types::*;
