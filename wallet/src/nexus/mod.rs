//! Nexus SDK session handling and the balance refresh orchestrator

pub mod file_session;
pub mod orchestrator;

pub use file_session::{read_records, FixedProviderSource, JsonFileConnector, JsonFileSession};
pub use orchestrator::{BalanceOrchestrator, BalanceState};
