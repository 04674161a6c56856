mod defaults;
mod io;
mod schema;
mod validate;

pub use io::load_config;
pub use schema::{Config, FetchConfig, MonitorConfig, SlackConfig, SourcesConfig, StateConfig};
pub use validate::ConfigError;
