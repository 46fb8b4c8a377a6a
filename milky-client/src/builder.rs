//! Client builder.

use crate::client::MilkyClient;
use crate::error::ClientError;
use crate::reconnect::ReconnectConfig;
use std::time::Duration;
use url::Url;

/// Default port shared by the HTTP API and the event stream.
pub const DEFAULT_PORT: u16 = 3010;

/// Default host used by [`ClientBuilder::from_env`].
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Builder for configuring and creating a client.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    host: String,
    port: Option<u16>,
    api_port: Option<u16>,
    event_port: Option<u16>,
    token: Option<String>,
    request_timeout: Duration,
    connect_timeout: Duration,
    reconnect_config: ReconnectConfig,
}

impl ClientBuilder {
    /// Creates a new client builder for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Some(DEFAULT_PORT),
            api_port: None,
            event_port: None,
            token: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            reconnect_config: ReconnectConfig::default(),
        }
    }

    /// Creates a builder from `MILKY_HOST`, `MILKY_PORT`, `MILKY_API_PORT`,
    /// `MILKY_EVENT_PORT` and `MILKY_TOKEN`.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if a port variable is not a valid port.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = |key: &str| -> Result<Option<u16>, ClientError> {
            var(key)
                .map(|v| {
                    v.trim()
                        .parse::<u16>()
                        .map_err(|_| ClientError::config(format!("{key} is not a valid port: {v}")))
                })
                .transpose()
        };

        let mut builder = Self::new(var("MILKY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()));
        if let Some(shared) = port("MILKY_PORT")? {
            builder.port = Some(shared);
        }
        builder.api_port = port("MILKY_API_PORT")?;
        builder.event_port = port("MILKY_EVENT_PORT")?;
        builder.token = var("MILKY_TOKEN");
        Ok(builder)
    }

    /// Sets the port shared by the API and the event stream. `None` requires
    /// both specific ports.
    #[must_use]
    pub fn port(mut self, port: impl Into<Option<u16>>) -> Self {
        self.port = port.into();
        self
    }

    /// Sets the port of the HTTP API.
    #[must_use]
    pub fn api_port(mut self, port: u16) -> Self {
        self.api_port = Some(port);
        self
    }

    /// Sets the port of the WebSocket event stream.
    #[must_use]
    pub fn event_port(mut self, port: u16) -> Self {
        self.event_port = Some(port);
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the timeout of a single API request.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables or disables automatic reconnection.
    #[must_use]
    pub fn reconnect(mut self, enabled: bool) -> Self {
        self.reconnect_config.enabled = enabled;
        self
    }

    /// Sets the initial reconnection delay.
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_config.initial_delay = delay;
        self
    }

    /// Sets the maximum reconnection delay.
    #[must_use]
    pub fn max_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_config.max_delay = delay;
        self
    }

    /// Sets the maximum reconnection attempts (0 = unlimited).
    #[must_use]
    pub fn max_reconnect_attempts(mut self, max: usize) -> Self {
        self.reconnect_config.max_attempts = max;
        self
    }

    /// Replaces the whole reconnection policy.
    #[must_use]
    pub fn reconnect_config(mut self, config: ReconnectConfig) -> Self {
        self.reconnect_config = config;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if neither a shared port nor both
    /// specific ports are set, and `ClientError::Http` if the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<MilkyClient, ClientError> {
        let (Some(api_port), Some(event_port)) =
            (self.api_port.or(self.port), self.event_port.or(self.port))
        else {
            return Err(ClientError::config(
                "either port, or both api_port and event_port must be provided",
            ));
        };

        let api_base = Url::parse(&format!("http://{}:{api_port}/api/", self.host))?;
        let event_url = Url::parse(&format!("ws://{}:{event_port}/event", self.host))?;

        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;

        tracing::debug!(%api_base, %event_url, "building client");

        Ok(MilkyClient::new(
            http,
            api_base,
            event_url,
            self.token,
            self.connect_timeout,
            self.reconnect_config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_port() {
        let client = ClientBuilder::new("localhost").build().unwrap();
        assert_eq!(client.api_base().as_str(), "http://localhost:3010/api/");
        assert_eq!(client.event_url().as_str(), "ws://localhost:3010/event");
    }

    #[test]
    fn test_specific_ports_override_shared_port() {
        let client = ClientBuilder::new("10.0.0.1")
            .port(4000)
            .api_port(4001)
            .build()
            .unwrap();
        assert_eq!(client.api_base().as_str(), "http://10.0.0.1:4001/api/");
        assert_eq!(client.event_url().as_str(), "ws://10.0.0.1:4000/event");
    }

    #[test]
    fn test_missing_ports() {
        let result = ClientBuilder::new("localhost").port(None).api_port(1).build();
        assert!(matches!(result, Err(ClientError::Config { .. })));

        let client = ClientBuilder::new("localhost")
            .port(None)
            .api_port(1)
            .event_port(2)
            .build()
            .unwrap();
        assert_eq!(client.event_url().as_str(), "ws://localhost:2/event");
    }

    #[test]
    fn test_from_env_lookup() {
        let builder = ClientBuilder::from_lookup(lookup(&[
            ("MILKY_HOST", "bot.local"),
            ("MILKY_API_PORT", "8080"),
            ("MILKY_TOKEN", "secret"),
        ]))
        .unwrap();
        assert_eq!(builder.host, "bot.local");
        assert_eq!(builder.port, Some(DEFAULT_PORT));
        assert_eq!(builder.api_port, Some(8080));
        assert_eq!(builder.event_port, None);
        assert_eq!(builder.token.as_deref(), Some("secret"));

        let builder = ClientBuilder::from_lookup(lookup(&[("MILKY_PORT", " ")])).unwrap();
        assert_eq!(builder.host, DEFAULT_HOST);
        assert_eq!(builder.port, Some(DEFAULT_PORT));
        assert_eq!(builder.token, None);
    }

    #[test]
    fn test_from_env_invalid_port() {
        let result = ClientBuilder::from_lookup(lookup(&[("MILKY_EVENT_PORT", "70000")]));
        assert!(matches!(result, Err(ClientError::Config { .. })));
    }
}
