use practice_portal::{AppConfig, ConfigError, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

const GATEWAY_VARS: [&str; 10] = [
    "APP_ENV",
    "BIND_ADDR",
    "GATEWAY_PROTECTED_PREFIXES",
    "GATEWAY_AUTH_ONLY_PATHS",
    "GATEWAY_ADMIN_ONLY_PATHS",
    "GATEWAY_LOGIN_PATH",
    "GATEWAY_LANDING_PATH",
    "GATEWAY_ADMIN_ROLE_ID",
    "SESSION_TOKEN_COOKIE",
    "SESSION_USER_COOKIE",
];

/// Utility to run a test function with a clean gateway environment and restore
/// the original variables afterward
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = GATEWAY_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in GATEWAY_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_defaults_without_environment() {
    let config = run_with_env(|| AppConfig::load().unwrap());

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.rules.login_path, "/login");
    assert_eq!(config.rules.landing_path, "/dashboard");
    assert_eq!(config.rules.admin_role_id, 4);
    assert_eq!(config.cookies.token, "token");
    assert_eq!(config.cookies.user, "user");
}

#[test]
#[serial]
fn test_app_config_reads_route_tables_from_environment() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("GATEWAY_PROTECTED_PREFIXES", "/portal,/billing");
            env::set_var("GATEWAY_ADMIN_ONLY_PATHS", "/billing/rates");
            env::set_var("GATEWAY_LANDING_PATH", "/portal");
            env::set_var("GATEWAY_ADMIN_ROLE_ID", "1");
            env::set_var("SESSION_TOKEN_COOKIE", "sid");
        }
        AppConfig::load().unwrap()
    });

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.rules.protected_prefixes, vec!["/portal", "/billing"]);
    assert_eq!(config.rules.admin_only_paths, vec!["/billing/rates"]);
    assert_eq!(config.rules.landing_path, "/portal");
    assert_eq!(config.rules.admin_role_id, 1);
    assert_eq!(config.cookies.token, "sid");
    // Unset variables keep their defaults.
    assert_eq!(
        config.rules.auth_only_paths,
        vec!["/login", "/sign-up", "/reset-password"]
    );
}

#[test]
#[serial]
fn test_app_config_fails_fast_on_redirect_loop() {
    let result = run_with_env(|| {
        unsafe {
            env::set_var("GATEWAY_LOGIN_PATH", "/dashboard/login");
        }
        AppConfig::load()
    });

    assert_eq!(
        result.unwrap_err(),
        ConfigError::LoginPathProtected("/dashboard/login".to_string())
    );
}

#[test]
#[serial]
fn test_app_config_fails_fast_on_bad_role_id() {
    let result = run_with_env(|| {
        unsafe {
            env::set_var("GATEWAY_ADMIN_ROLE_ID", "four");
        }
        AppConfig::load()
    });

    assert!(matches!(
        result,
        Err(ConfigError::InvalidInteger { var: "GATEWAY_ADMIN_ROLE_ID", .. })
    ));
}
