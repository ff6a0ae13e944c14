use serde::Deserialize;

/// Runtime settings for the inventory server.
///
/// Values are layered from `config/default.yaml`, an optional
/// `config/local.yaml` and `APP_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// SQLite database path or URL.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Directory containing the Tera templates.
    pub templates_dir: String,
    /// Key used to sign flash message cookies; at least 64 bytes.
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl ServerConfig {
    /// Builds the configuration from defaults, YAML files and the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("database_url", "inventory.db")?
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("templates_dir", "templates")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
