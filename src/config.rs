use std::env;

use thiserror::Error;

use crate::{gateway::RouteRules, session::SessionCookies};

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// consumed by `AppState::new`, which turns it into the shared gateway.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Route tables and redirect targets for the access gateway.
    pub rules: RouteRules,
    // Names of the cookies carrying the session token and user profile.
    pub cookies: SessionCookies,
}

/// Env
///
/// Runtime context. `Local` logs human-readable output, `Production` emits JSON.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ConfigError
///
/// A configuration that would make the gateway misbehave. These are deployment
/// bugs, so `main` refuses to start on any of them.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be an integer, got {value:?}")]
    InvalidInteger { var: &'static str, value: String },

    #[error("{var} contains {path:?}, which does not start with '/'")]
    RelativePath { var: &'static str, path: String },

    #[error("{var} must not be empty")]
    EmptyValue { var: &'static str },

    #[error("login path {0:?} is protected, anonymous visitors would loop")]
    LoginPathProtected(String),

    #[error("landing path {0:?} is auth-only, signed-in users would loop")]
    LandingPathAuthOnly(String),

    #[error("landing path {0:?} is admin-only, non-admin users would loop")]
    LandingPathAdminOnly(String),
}

const PROTECTED_PREFIXES: &str = "GATEWAY_PROTECTED_PREFIXES";
const AUTH_ONLY_PATHS: &str = "GATEWAY_AUTH_ONLY_PATHS";
const ADMIN_ONLY_PATHS: &str = "GATEWAY_ADMIN_ONLY_PATHS";
const LOGIN_PATH: &str = "GATEWAY_LOGIN_PATH";
const LANDING_PATH: &str = "GATEWAY_LANDING_PATH";
const ADMIN_ROLE_ID: &str = "GATEWAY_ADMIN_ROLE_ID";
const TOKEN_COOKIE: &str = "SESSION_TOKEN_COOKIE";
const USER_COOKIE: &str = "SESSION_USER_COOKIE";

impl Default for AppConfig {
    /// default
    ///
    /// The therapy-practice route tables with local settings. Used by tests to
    /// build state without touching the environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "0.0.0.0:3000".to_string(),
            rules: RouteRules::default(),
            cookies: SessionCookies::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from process environment variables. Every variable
    /// is optional and falls back to the built-in route tables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// from_lookup
    ///
    /// Same as [`AppConfig::load`], reading variables through `lookup` instead of
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let env = match lookup("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };

        let list = |var: &'static str, fallback: Vec<String>| match lookup(var) {
            Some(raw) => split_list(&raw),
            None => fallback,
        };

        let admin_role_id = match lookup(ADMIN_ROLE_ID) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidInteger {
                    var: ADMIN_ROLE_ID,
                    value: raw,
                })?,
            None => defaults.rules.admin_role_id,
        };

        let rules = RouteRules {
            protected_prefixes: list(PROTECTED_PREFIXES, defaults.rules.protected_prefixes),
            auth_only_paths: list(AUTH_ONLY_PATHS, defaults.rules.auth_only_paths),
            admin_only_paths: list(ADMIN_ONLY_PATHS, defaults.rules.admin_only_paths),
            login_path: trimmed(lookup(LOGIN_PATH)).unwrap_or(defaults.rules.login_path),
            landing_path: trimmed(lookup(LANDING_PATH)).unwrap_or(defaults.rules.landing_path),
            admin_role_id,
        };

        let cookies = SessionCookies {
            token: trimmed(lookup(TOKEN_COOKIE)).unwrap_or(defaults.cookies.token),
            user: trimmed(lookup(USER_COOKIE)).unwrap_or(defaults.cookies.user),
        };

        let config = Self {
            env,
            bind_addr: trimmed(lookup("BIND_ADDR")).unwrap_or(defaults.bind_addr),
            rules,
            cookies,
        };
        config.validate()?;
        Ok(config)
    }

    /// validate
    ///
    /// Rejects route tables that cannot work: relative paths, empty cookie names,
    /// and redirect targets that the gateway itself would redirect away from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;

        for (var, paths) in [
            (PROTECTED_PREFIXES, &rules.protected_prefixes),
            (AUTH_ONLY_PATHS, &rules.auth_only_paths),
            (ADMIN_ONLY_PATHS, &rules.admin_only_paths),
        ] {
            for path in paths {
                require_absolute(var, path)?;
            }
        }
        require_absolute(LOGIN_PATH, &rules.login_path)?;
        require_absolute(LANDING_PATH, &rules.landing_path)?;

        if self.cookies.token.is_empty() {
            return Err(ConfigError::EmptyValue { var: TOKEN_COOKIE });
        }
        if self.cookies.user.is_empty() {
            return Err(ConfigError::EmptyValue { var: USER_COOKIE });
        }

        if rules.is_protected(&rules.login_path) {
            return Err(ConfigError::LoginPathProtected(rules.login_path.clone()));
        }
        if rules.is_auth_only(&rules.landing_path) {
            return Err(ConfigError::LandingPathAuthOnly(rules.landing_path.clone()));
        }
        if rules.is_admin_only(&rules.landing_path) {
            return Err(ConfigError::LandingPathAdminOnly(rules.landing_path.clone()));
        }
        Ok(())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn require_absolute(var: &'static str, path: &str) -> Result<(), ConfigError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::RelativePath {
            var,
            path: path.to_string(),
        })
    }
}
