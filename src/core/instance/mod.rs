pub mod manager;
pub mod model;
pub mod workspace;

pub use manager::ConfigStore;
pub use model::{parse_ram_gb, DistributionKind, SavedConfiguration, DEFAULT_RAM_GB};
pub use workspace::ServerWorkspace;
