//! Environment-driven service configuration.

use anyhow::Context;
use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Feature table JSON; the bundled table is used when unset.
    pub features_path: Option<PathBuf>,
    /// Directory holding `phrases-<lang>.json` corpus files.
    pub phrases_dir: PathBuf,
    /// JSON map of language tag to phrases with pre-generated audio.
    pub audio_manifest: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment (after `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            features_path: lookup("FEATURES_PATH").map(PathBuf::from),
            phrases_dir: lookup("PHRASES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./phrases")),
            audio_manifest: lookup("AUDIO_MANIFEST").map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/pp")])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.phrases_dir, PathBuf::from("./phrases"));
        assert!(config.features_path.is_none());
        assert!(config.audio_manifest.is_none());
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/pp"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("AUDIO_MANIFEST", "audio.json"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.audio_manifest, Some(PathBuf::from("audio.json")));
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
