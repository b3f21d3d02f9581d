use arena_rating::RatingConfig;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub ledger: LedgerSettings,
    pub rating: RatingSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Where the append-only ledger files live. With no directory
/// configured the arena runs in memory and nothing survives restarts.
#[derive(serde::Deserialize, Clone, Default)]
pub struct LedgerSettings {
    pub data_dir: Option<PathBuf>,
}

/// The process-wide rating constants. Changing `k` on a deployed
/// ledger requires a rebuild; stored ratings are never patched.
#[derive(serde::Deserialize, Clone)]
pub struct RatingSettings {
    pub k: f64,
    pub baseline: i32,
}

impl RatingSettings {
    pub fn as_config(&self) -> RatingConfig {
        RatingConfig {
            k: self.k,
            baseline: self.baseline,
        }
    }
}

/// The runtime environment, selected by `APP_ENVIRONMENT`.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // E.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`.
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
