//! The client's configuration store.
//!
//! Four keys, all present from construction: `server`, `api_version`,
//! `user_agent` and `adapter`. Typed setters validate their values; the
//! string boundary ([`Config::get_str`], [`Config::set_str`]) is where
//! unknown keys are reported.

use osm_api_core::{ApiVersion, ConfigKey, OsmError, OsmResult};
use osm_api_transport::BoxedTransport;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Default API server.
pub const DEFAULT_SERVER: &str = "https://www.openstreetmap.org/";

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("osm-api/", env!("CARGO_PKG_VERSION"));

/// Client configuration.
#[derive(Clone)]
pub struct Config {
    // Validated as an absolute http(s) URL; kept as the caller wrote it.
    server: String,
    api_version: ApiVersion,
    user_agent: String,
    transport: BoxedTransport,
}

impl Config {
    /// Create a configuration with default values and the given transport.
    pub fn new(transport: BoxedTransport) -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            api_version: ApiVersion::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport,
        }
    }

    /// Server base URL.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Configured API version.
    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The transport.
    pub fn transport(&self) -> &BoxedTransport {
        &self.transport
    }

    /// Read one value as a string. The adapter reads as the transport's name.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Server => self.server.clone(),
            ConfigKey::ApiVersion => self.api_version.to_string(),
            ConfigKey::UserAgent => self.user_agent.clone(),
            ConfigKey::Adapter => self.transport.name().to_string(),
        }
    }

    /// Every key with its current value.
    pub fn snapshot(&self) -> BTreeMap<ConfigKey, String> {
        ConfigKey::ALL.into_iter().map(|key| (key, self.get(key))).collect()
    }

    /// Set one value from a string.
    ///
    /// The adapter cannot be named by a string; use [`Config::set_transport`].
    pub fn set(&mut self, key: ConfigKey, value: &str) -> OsmResult<()> {
        match key {
            ConfigKey::Server => self.set_server(value),
            ConfigKey::ApiVersion => {
                self.api_version = value.parse()?;
                Ok(())
            }
            ConfigKey::UserAgent => self.set_user_agent(value),
            ConfigKey::Adapter => Err(OsmError::invalid_config(
                key.as_str(),
                "the adapter is a transport instance; set it with set_transport",
            )),
        }
    }

    /// Set the server base URL. Must be an absolute http or https URL.
    pub fn set_server(&mut self, value: &str) -> OsmResult<()> {
        let url = Url::parse(value)
            .map_err(|e| OsmError::invalid_config(ConfigKey::Server.as_str(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OsmError::invalid_config(
                ConfigKey::Server.as_str(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        self.server = value.to_string();
        Ok(())
    }

    /// Set the API version.
    pub fn set_api_version(&mut self, version: ApiVersion) {
        self.api_version = version;
    }

    /// Set the `User-Agent` header value.
    pub fn set_user_agent(&mut self, value: &str) -> OsmResult<()> {
        if value.trim().is_empty() {
            return Err(OsmError::invalid_config(
                ConfigKey::UserAgent.as_str(),
                "must not be empty",
            ));
        }
        self.user_agent = value.to_string();
        Ok(())
    }

    /// Replace the transport.
    pub fn set_transport(&mut self, transport: BoxedTransport) {
        self.transport = transport;
    }

    /// Read a value by key name.
    pub fn get_str(&self, key: &str) -> OsmResult<String> {
        Ok(self.get(key.parse()?))
    }

    /// Set a value by key name.
    pub fn set_str(&mut self, key: &str, value: &str) -> OsmResult<()> {
        self.set(key.parse()?, value)
    }

    /// Base of every versioned request: `{server}/api/{version}`.
    pub(crate) fn api_base(&self) -> String {
        format!(
            "{}/api/{}",
            self.server.trim_end_matches('/'),
            self.api_version
        )
    }

    /// The capabilities URL, which is not versioned.
    pub(crate) fn capabilities_url(&self) -> String {
        format!("{}/api/capabilities", self.server.trim_end_matches('/'))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("api_version", &self.api_version.as_str())
            .field("user_agent", &self.user_agent)
            .field("adapter", &self.transport.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osm_api_transport::MemoryTransport;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn config() -> Config {
        Config::new(Arc::new(MemoryTransport::new()))
    }

    #[test]
    fn test_defaults() {
        let config = config();
        let snapshot = config.snapshot();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[&ConfigKey::Server], "https://www.openstreetmap.org/");
        assert_eq!(snapshot[&ConfigKey::ApiVersion], "0.6");
        assert_eq!(snapshot[&ConfigKey::UserAgent], DEFAULT_USER_AGENT);
        assert_eq!(snapshot[&ConfigKey::Adapter], "memory");
        assert!(DEFAULT_USER_AGENT.starts_with("osm-api/"));
    }

    #[rstest]
    #[case(ConfigKey::Server, "https://api06.dev.openstreetmap.org")]
    #[case(ConfigKey::ApiVersion, "0.7")]
    #[case(ConfigKey::UserAgent, "my-editor/2.0")]
    fn test_set_then_get(#[case] key: ConfigKey, #[case] value: &str) {
        let mut config = config();
        config.set(key, value).unwrap();
        assert_eq!(config.get(key), value);
        assert_eq!(config.get_str(key.as_str()).unwrap(), value);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = config();

        let err = config.get_str("api").unwrap_err();
        assert_eq!(err.to_string(), "Unknown config parameter 'api'");

        let err = config.set_str("api", "0.6").unwrap_err();
        assert!(matches!(err, OsmError::UnknownConfigParameter(ref key) if key == "api"));
    }

    #[rstest]
    #[case(ConfigKey::Server, "not a url")]
    #[case(ConfigKey::Server, "ftp://example.org/")]
    #[case(ConfigKey::ApiVersion, "")]
    #[case(ConfigKey::ApiVersion, "six")]
    #[case(ConfigKey::UserAgent, "  ")]
    #[case(ConfigKey::Adapter, "reqwest")]
    fn test_invalid_values(#[case] key: ConfigKey, #[case] value: &str) {
        let mut config = config();
        let before = config.snapshot();

        let err = config.set(key, value).unwrap_err();
        assert!(matches!(err, OsmError::InvalidConfigValue { .. }), "{err:?}");
        assert_eq!(config.snapshot(), before);
    }

    #[test]
    fn test_urls() {
        let mut config = config();
        assert_eq!(config.api_base(), "https://www.openstreetmap.org/api/0.6");
        assert_eq!(
            config.capabilities_url(),
            "https://www.openstreetmap.org/api/capabilities"
        );

        config.set_server("http://localhost:3000/osm/").unwrap();
        assert_eq!(config.api_base(), "http://localhost:3000/osm/api/0.6");
    }

    #[test]
    fn test_debug_names_adapter() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("memory"));
    }
}
