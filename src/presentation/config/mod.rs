mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, DriveSettings, ProviderSettings, ServerSettings, Settings, SettingsError,
};
