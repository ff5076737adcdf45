pub mod registry;
pub mod parser;
pub mod runner;

pub use registry::{AgentProfile, AgentRegistry};
pub use runner::{AgentRunner, ReviewAgent};
