pub mod traits;
pub mod splitter;
pub mod data;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use splitter::SplitterConfig;
pub use data::DataConfig;
