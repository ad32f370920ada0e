use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::Path;
use std::time::Duration;

/// The baseline configuration is compiled into the crate: a static site has no filesystem to read
/// it from at runtime. Environment specific files and `APP_*` variables are layered on top when the
/// host has them, which is how the access key is injected at build or deploy time.
const BASE_CONFIGURATION: &str = include_str!("../configuration/base.yaml");

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub submission: SubmissionSettings,
    pub interface: InterfaceSettings,
    #[serde(default)]
    pub features: FeatureSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SubmissionSettings {
    pub base_url: String,
    pub access_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl SubmissionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

/// Thresholds and timings of the page behavior.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct InterfaceSettings {
    /// Scroll offset past which the nav gets its `scrolled` state.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub nav_scroll_threshold: f64,
    /// Added to the scroll offset when deciding which section is current.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub active_section_offset: f64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_throttle_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub active_section_debounce_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub status_clear_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_to_top_threshold: f64,
}

impl InterfaceSettings {
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_milliseconds)
    }

    pub fn active_section_debounce(&self) -> Duration {
        Duration::from_millis(self.active_section_debounce_milliseconds)
    }

    pub fn status_clear_delay(&self) -> Duration {
        Duration::from_millis(self.status_clear_milliseconds)
    }
}

/// Optional page features. All of them are off unless switched on explicitly.
#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct FeatureSettings {
    #[serde(default)]
    pub theme_switcher: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub scroll_to_top: bool,
}

/// Reads the baseline, then `configuration/{environment}.yaml` if present, then `APP_*` variables.
///
/// E.g. `APP_SUBMISSION__ACCESS_KEY=...` would set `Settings.submission.access_key`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    build_configuration(environment, &base_path.join("configuration"))
}

/// Layers the files of `configuration_directory` for `environment` and `APP_*` variables over the
/// baseline. A missing directory or environment file is not an error.
pub fn build_configuration(
    environment: Environment,
    configuration_directory: &Path,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from_str(
            BASE_CONFIGURATION,
            config::FileFormat::Yaml,
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The baseline configuration alone, without looking at the host environment.
pub fn base_configuration() -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from_str(
            BASE_CONFIGURATION,
            config::FileFormat::Yaml,
        ))
        .build()?
        .try_deserialize::<Settings>()
}

/// The possible runtime environment for our application.
#[derive(Debug)]
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
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
