use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use dynsync_application::{CrmClientConfig, DEFAULT_AUTHORITY_URL};
use dynsync_domain::Credentials;
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub admin_api_token: String,
    pub seed_credentials: Credentials,
    pub crm_client: CrmClientConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, StartupError> {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let admin_api_token = required_env("ADMIN_API_TOKEN")?;
        if admin_api_token.len() < MIN_ADMIN_TOKEN_LENGTH {
            return Err(StartupError::Config(format!(
                "ADMIN_API_TOKEN must be at least {MIN_ADMIN_TOKEN_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let seed_credentials = Credentials::new(
            optional_env("DYNAMICS_CLIENT_ID"),
            optional_env("DYNAMICS_CLIENT_SECRET"),
            optional_env("DYNAMICS_TENANT_ID"),
            optional_env("DYNAMICS_RESOURCE_URL"),
        );

        let authority_url = env::var("DYNAMICS_AUTHORITY_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_owned());
        let request_timeout = match env::var("DYNAMICS_REQUEST_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    StartupError::Config(format!(
                        "DYNAMICS_REQUEST_TIMEOUT_SECS must be a positive integer, got '{value}'"
                    ))
                })?,
            Err(_) => CrmClientConfig::default().request_timeout,
        };

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            admin_api_token,
            seed_credentials,
            crm_client: CrmClientConfig {
                authority_url,
                request_timeout,
                ..CrmClientConfig::default()
            },
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, StartupError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            StartupError::Config(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, StartupError> {
    env::var(name).map_err(|_| StartupError::Config(format!("{name} is required")))
}

fn optional_env(name: &str) -> String {
    env::var(name).unwrap_or_default()
}
