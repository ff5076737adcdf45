pub mod provider;
pub mod types;

pub use provider::ModelProvider;
pub use types::ModelResponse;
