//! bionode-common: shared errors, configuration and the allow-listed HTTP client
//! used by every bionode crate.

pub mod error;
pub mod config;
pub mod sandbox;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ChemblConfig, GlyGenConfig, MetGeneConfig, RankingConfig, SourcesConfig};
pub use error::{BionodeError, Result};
pub use sandbox::SandboxClient;
