//! HTTP server configuration: settings loaded via OrthoConfig and the
//! builder-style object consumed by [`super::create_server`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SEED_DEMO_CUSTOMERS: bool = true;

/// Settings read from `CUSTOMERS_*` environment variables, configuration
/// files and the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CUSTOMERS")]
pub struct ServerSettings {
    /// Address to listen on.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Seed the store with the demo customers at startup.
    pub seed_demo_customers: Option<bool>,
}

impl ServerSettings {
    /// Configured host, falling back to all interfaces.
    pub fn host(&self) -> IpAddr {
        self.host.unwrap_or(DEFAULT_HOST)
    }

    /// Configured port, falling back to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether to seed the demo customers, on unless disabled.
    pub fn seed_demo_customers(&self) -> bool {
        self.seed_demo_customers.unwrap_or(DEFAULT_SEED_DEMO_CUSTOMERS)
    }

    /// Socket address assembled from host and port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host(), self.port())
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) seed_demo_customers: bool,
}

impl ServerConfig {
    /// Construct a configuration listening on `bind_addr` with an empty store.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            seed_demo_customers: false,
        }
    }

    /// Seed the in-memory store with the demo customers.
    #[must_use]
    pub const fn with_demo_customers(mut self, seed: bool) -> Self {
        self.seed_demo_customers = seed;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by unit tests")
    )]
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self::new(settings.bind_addr()).with_demo_customers(settings.seed_demo_customers())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    pub(crate) fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("customer-service")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env([
            ("CUSTOMERS_HOST", None::<String>),
            ("CUSTOMERS_PORT", None::<String>),
            ("CUSTOMERS_SEED_DEMO_CUSTOMERS", None::<String>),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.seed_demo_customers());
        assert!(ServerConfig::from(&settings).seed_demo_customers);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CUSTOMERS_HOST", Some("127.0.0.1".to_owned())),
            ("CUSTOMERS_PORT", Some("9090".to_owned())),
            ("CUSTOMERS_SEED_DEMO_CUSTOMERS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let config = ServerConfig::from(&settings);

        assert_eq!(config.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert!(!config.seed_demo_customers);
    }

    #[rstest]
    fn new_config_starts_with_an_empty_store() {
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("addr");
        let config = ServerConfig::new(addr);
        assert!(!config.seed_demo_customers);
        assert!(config.with_demo_customers(true).seed_demo_customers);
    }
}
