mod whispr_config;

pub use whispr_config::{ConfigError, WhisprConfig};
