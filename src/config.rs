// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, default values and the [`AppConfig`] built
//! from them once at startup. Nothing else in the crate reads the process
//! environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `APP_ENV` | `development` or `production` | `development` |
//! | `DATABASE_PATH` | redb database file | `./data/veilend.redb` |
//! | `ABI_DIR` | Directory holding contract ABI descriptors | `./abis` |
//! | `RPC_URL` | RPC endpoint used for contract reads | Unset (reads degrade) |
//! | `ADMIN_NODE_URL` | RPC endpoint used for admin-signed writes | Unset (writes disabled) |
//! | `ADMIN_WALLET_ADDRESS` | Admin account address | Unset (writes disabled) |
//! | `ADMIN_PRIVATE_KEY` | Admin account key (hex or PEM) | Unset (writes disabled) |
//! | `JWT_SECRET` | HMAC secret for session tokens | `dev_secret` (development only) |
//! | `JWT_EXPIRES_IN` | Session lifetime (`3600`, `60m`, `12h`, `1d`) | `60m` |
//! | `NONCE_TTL_SECS` | Login nonce lifetime in seconds | `300` |
//! | `TX_SUBMISSION_TIMEOUT_SECS` | Upper bound on sending one signed transaction | `30` |
//! | `TX_CONFIRMATION_TIMEOUT_SECS` | Upper bound on confirmation waits | `120` |
//! | `LOGIN_DOMAIN_NAME` | EIP-712 domain name login documents must carry | `VeiLend` |
//! | `LOGIN_DOMAIN_VERSION` | EIP-712 domain version login documents must carry | `1` |
//! | `LOGIN_CHAIN_ID` | Chain id login documents must carry | Unset (any chain; required in production) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const ABI_DIR_ENV: &str = "ABI_DIR";
pub const RPC_URL_ENV: &str = "RPC_URL";
pub const ADMIN_NODE_URL_ENV: &str = "ADMIN_NODE_URL";
pub const ADMIN_WALLET_ADDRESS_ENV: &str = "ADMIN_WALLET_ADDRESS";
pub const ADMIN_PRIVATE_KEY_ENV: &str = "ADMIN_PRIVATE_KEY";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
pub const NONCE_TTL_ENV: &str = "NONCE_TTL_SECS";
pub const TX_SUBMISSION_TIMEOUT_ENV: &str = "TX_SUBMISSION_TIMEOUT_SECS";
pub const TX_CONFIRMATION_TIMEOUT_ENV: &str = "TX_CONFIRMATION_TIMEOUT_SECS";
pub const LOGIN_DOMAIN_NAME_ENV: &str = "LOGIN_DOMAIN_NAME";
pub const LOGIN_DOMAIN_VERSION_ENV: &str = "LOGIN_DOMAIN_VERSION";
pub const LOGIN_CHAIN_ID_ENV: &str = "LOGIN_CHAIN_ID";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_PATH: &str = "./data/veilend.redb";
const DEFAULT_ABI_DIR: &str = "./abis";

/// Development-only session secret. Refused when `APP_ENV=production`.
pub const DEV_JWT_SECRET: &str = "dev_secret";

const DEFAULT_JWT_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_LOGIN_DOMAIN_NAME: &str = "VeiLend";
const DEFAULT_LOGIN_DOMAIN_VERSION: &str = "1";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// The administrative signing credential used for every contract write.
///
/// Loaded once from the environment and injected into the chain gateway.
/// End users never supply or select it.
#[derive(Clone)]
pub struct AdminCredential {
    /// RPC endpoint the signed transactions are sent to
    pub node_url: String,
    /// Account the transactions are sent from
    pub wallet_address: Address,
    private_key: String,
}

impl AdminCredential {
    pub fn new(node_url: impl Into<String>, wallet_address: Address, private_key: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            wallet_address,
            private_key: private_key.into(),
        }
    }

    /// Raw key material (hex, with or without `0x`, or PEM).
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("node_url", &self.node_url)
            .field("wallet_address", &self.wallet_address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// The EIP-712 domain a login document must be signed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginDomain {
    pub name: String,
    pub version: String,
    /// When set, the document's `chainId` must equal it
    pub chain_id: Option<u64>,
}

impl Default for LoginDomain {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOGIN_DOMAIN_NAME.to_string(),
            version: DEFAULT_LOGIN_DOMAIN_VERSION.to_string(),
            chain_id: None,
        }
    }
}

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("{missing} must be set together with the other ADMIN_* variables")]
    IncompleteAdminCredential { missing: &'static str },

    #[error("{0} must be set when APP_ENV=production")]
    RequiredInProduction(&'static str),
}

/// Process-wide configuration, constructed once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database_path: PathBuf,
    pub abi_dir: PathBuf,
    pub rpc_url: Option<String>,
    pub admin: Option<AdminCredential>,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub nonce_ttl: Duration,
    pub login_domain: LoginDomain,
    pub submission_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = match get(APP_ENV_ENV).as_deref().map(str::to_ascii_lowercase) {
            None => Environment::Development,
            Some(v) if v == "development" || v == "dev" => Environment::Development,
            Some(v) if v == "production" || v == "prod" => Environment::Production,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: APP_ENV_ENV,
                    reason: format!("unknown environment `{other}`"),
                })
            }
        };

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::to_ascii_lowercase) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let jwt_secret = match (get(JWT_SECRET_ENV), environment) {
            (Some(secret), _) => secret,
            (None, Environment::Development) => DEV_JWT_SECRET.to_string(),
            (None, Environment::Production) => {
                return Err(ConfigError::RequiredInProduction(JWT_SECRET_ENV))
            }
        };
        if environment == Environment::Production && jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::InvalidValue {
                name: JWT_SECRET_ENV,
                reason: "the development secret cannot be used in production".to_string(),
            });
        }

        let jwt_ttl = match get(JWT_EXPIRES_IN_ENV) {
            Some(raw) => parse_duration(&raw).ok_or_else(|| ConfigError::InvalidValue {
                name: JWT_EXPIRES_IN_ENV,
                reason: format!("cannot parse duration `{raw}`"),
            })?,
            None => DEFAULT_JWT_TTL,
        };

        let nonce_ttl = seconds(get(NONCE_TTL_ENV), NONCE_TTL_ENV, DEFAULT_NONCE_TTL)?;
        let submission_timeout = seconds(
            get(TX_SUBMISSION_TIMEOUT_ENV),
            TX_SUBMISSION_TIMEOUT_ENV,
            DEFAULT_SUBMISSION_TIMEOUT,
        )?;
        let confirmation_timeout = seconds(
            get(TX_CONFIRMATION_TIMEOUT_ENV),
            TX_CONFIRMATION_TIMEOUT_ENV,
            DEFAULT_CONFIRMATION_TIMEOUT,
        )?;

        let login_domain = LoginDomain {
            name: get(LOGIN_DOMAIN_NAME_ENV).unwrap_or_else(|| DEFAULT_LOGIN_DOMAIN_NAME.to_string()),
            version: get(LOGIN_DOMAIN_VERSION_ENV)
                .unwrap_or_else(|| DEFAULT_LOGIN_DOMAIN_VERSION.to_string()),
            chain_id: get(LOGIN_CHAIN_ID_ENV)
                .map(|raw| {
                    raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                        name: LOGIN_CHAIN_ID_ENV,
                        reason: e.to_string(),
                    })
                })
                .transpose()?,
        };
        if environment == Environment::Production && login_domain.chain_id.is_none() {
            return Err(ConfigError::RequiredInProduction(LOGIN_CHAIN_ID_ENV));
        }

        let admin = admin_credential(
            get(ADMIN_NODE_URL_ENV),
            get(ADMIN_WALLET_ADDRESS_ENV),
            get(ADMIN_PRIVATE_KEY_ENV),
        )?;

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment,
            database_path: get(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            abi_dir: get(ABI_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ABI_DIR)),
            rpc_url: get(RPC_URL_ENV),
            admin,
            jwt_secret,
            jwt_ttl,
            nonce_ttl,
            login_domain,
            submission_timeout,
            confirmation_timeout,
            log_format,
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn seconds(raw: Option<String>, name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match raw {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

fn admin_credential(
    node_url: Option<String>,
    wallet_address: Option<String>,
    private_key: Option<String>,
) -> Result<Option<AdminCredential>, ConfigError> {
    match (node_url, wallet_address, private_key) {
        (None, None, None) => Ok(None),
        (Some(node_url), Some(wallet_address), Some(private_key)) => {
            let wallet_address =
                Address::from_str(&wallet_address).map_err(|e| ConfigError::InvalidValue {
                    name: ADMIN_WALLET_ADDRESS_ENV,
                    reason: e.to_string(),
                })?;
            Ok(Some(AdminCredential::new(node_url, wallet_address, private_key)))
        }
        (node_url, wallet_address, _) => {
            let missing = if node_url.is_none() {
                ADMIN_NODE_URL_ENV
            } else if wallet_address.is_none() {
                ADMIN_WALLET_ADDRESS_ENV
            } else {
                ADMIN_PRIVATE_KEY_ENV
            };
            Err(ConfigError::IncompleteAdminCredential { missing })
        }
    }
}

/// Parse a duration such as `90`, `90s`, `60m`, `12h` or `1d`.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.char_indices().last()? {
        (idx, 's') => (&raw[..idx], 1),
        (idx, 'm') => (&raw[..idx], 60),
        (idx, 'h') => (&raw[..idx], 60 * 60),
        (idx, 'd') => (&raw[..idx], 24 * 60 * 60),
        _ => (raw, 1),
    };
    let value: u64 = digits.parse().ok()?;
    value.checked_mul(multiplier).map(Duration::from_secs)
}
