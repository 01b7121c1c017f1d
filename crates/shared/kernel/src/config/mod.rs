use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_PREFIX: &str = "AUTOANI";

#[autoani_derive::autoani_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file overlaid with `AUTOANI__`-prefixed environment variables.
///
/// The file defaults to `server` (any extension `config` understands, usually
/// `server.toml`) and is optional, so a deployment can run purely from the
/// environment. Nested keys use double underscores:
/// `AUTOANI__DATABASE__URL` sets `database.url`.
///
/// # Errors
/// Fails when an explicitly given file is missing or the merged sources do not
/// deserialize into `T`.
///
/// ```rust
/// use autoani_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let explicit = path.is_some();
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    info!(path = %effective_path.display(), "Loading configuration");

    Config::builder()
        .add_source(File::from(effective_path.as_path()).required(explicit))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoani_domain::config::ApiConfig;
    use std::io::Write;

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 8088\n\n[demo]\nenabled = true").unwrap();

        let cfg: ApiConfig = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert!(cfg.demo.enabled);
        assert_eq!(cfg.database.url, "mem://");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load_config::<ApiConfig>(Some("does/not/exist.toml"));
        assert!(result.is_err());
    }
}
