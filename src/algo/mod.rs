pub mod tabular;

pub use tabular::{TabularAgent, TabularAgentConfig};
