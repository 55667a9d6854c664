mod settings;

pub use settings::{Settings, SourceSettings, UpstreamSettings, CONFIG_PATH_ENV, ENV_PREFIX};
