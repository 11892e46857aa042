//! Tests for layered configuration loading
//!
//! Every test runs inside a figment `Jail`: a private working directory
//! and environment, serialized with the other jailed tests.

use bcon_infrastructure::config::{AppConfig, ConfigLoader, LogFormat};
use bcon_infrastructure::constants::{DEFAULT_CONFIG_FILENAME, DEFAULT_PORT};
use figment::Jail;

use crate::test_utils::MULTI_AGENT_TOML;

fn load(jail: &Jail, file: &str) -> figment::error::Result<AppConfig> {
    ConfigLoader::new()
        .with_config_path(jail.directory().join(file))
        .load()
        .map_err(|e| e.to_string().into())
}

#[test]
fn test_defaults_match_console_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("empty.toml", "")?;
        let config = load(jail, "empty.toml")?;

        assert_eq!(config.global.port, DEFAULT_PORT);
        assert_eq!(config.global.bind, "::");
        assert!(config.global.standalone);
        assert!(!config.global.ssl);
        assert_eq!(config.global.auth, vec!["basic"]);
        assert_eq!(config.global.acl, "none");
        assert_eq!(config.global.backend, "multi");
        assert_eq!(config.ui.refresh, 180);
        assert_eq!(config.ui.liverefresh, 5);
        assert_eq!(config.security.cookietime, 14);
        assert_eq!(config.cache.ttl_secs, 1800);
        assert!(config.inventory.is_none());
        Ok(())
    });
}

#[test]
fn test_file_sections_are_read() {
    Jail::expect_with(|jail| {
        jail.create_file("bcon.toml", MULTI_AGENT_TOML)?;
        let config = load(jail, "bcon.toml")?;

        assert!(!config.global.standalone);
        assert_eq!(config.global.backend, "memory");
        assert_eq!(config.global.acl, "basic");
        assert_eq!(config.auth_settings("BASIC")["users"]["alice"], "wonderland");
        assert_eq!(config.acl_settings("basic")["admins"][0], "admin");
        assert!(config.acl_settings("ldap").is_null());
        let inventory = config.inventory.expect("inventory section");
        assert_eq!(inventory["agents"][1]["name"], "srv2");
        Ok(())
    });
}

#[test]
fn test_logging_section() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bcon.toml",
            "[logging]\nlevel = \"debug\"\nformat = \"json\"\nfile = \"/var/log/bcon/bcon.log\"\n",
        )?;
        let config = load(jail, "bcon.toml")?;

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.logging.file.as_deref(),
            Some(std::path::Path::new("/var/log/bcon/bcon.log"))
        );
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bcon.toml",
            "[global]\nport = 5001\n[agents.srv1]\nurl = \"http://srv1:5000\"\n",
        )?;
        jail.set_env("BCON__GLOBAL__PORT", "6000");
        jail.set_env("BCON__GLOBAL__AUTH", "Basic, none");
        jail.set_env("BCON__AGENTS__SRV1__TIMEOUT_SECS", "3");

        let config = load(jail, "bcon.toml")?;
        assert_eq!(config.global.port, 6000);
        assert_eq!(config.global.auth, vec!["basic", "none"]);
        assert!(config.global.login_disabled());
        assert_eq!(config.agents["srv1"].timeout_secs, 3);
        assert_eq!(config.agents["srv1"].url, "http://srv1:5000");
        Ok(())
    });
}

#[test]
fn test_default_file_is_found_in_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_file(DEFAULT_CONFIG_FILENAME, "[ui]\nrefresh = 30\n")?;
        let config = ConfigLoader::new()
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config.ui.refresh, 30);
        Ok(())
    });
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    Jail::expect_with(|jail| {
        let result = ConfigLoader::new()
            .with_config_path(jail.directory().join("absent.toml"))
            .load();
        assert!(matches!(result, Err(bcon_domain::Error::Config { .. })));
        Ok(())
    });
}

#[test]
fn test_prefix_normalization() {
    Jail::expect_with(|jail| {
        jail.create_file("none.toml", "[global]\nprefix = \"none\"\n")?;
        jail.create_file("bad.toml", "[global]\nprefix = \"console\"\n")?;
        jail.create_file("good.toml", "[global]\nprefix = \"/console\"\n")?;

        assert_eq!(load(jail, "none.toml")?.global.prefix, "");
        assert_eq!(load(jail, "bad.toml")?.global.prefix, "");
        assert_eq!(load(jail, "good.toml")?.global.prefix, "/console");
        Ok(())
    });
}

#[test]
fn test_invalid_values_are_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("port.toml", "[global]\nport = 0\n")?;
        jail.create_file("ssl.toml", "[global]\nssl = true\nsslcert = \"/cert.pem\"\n")?;
        jail.create_file("ttl.toml", "[cache]\nttl_secs = 0\n")?;
        jail.create_file("agents.toml", "[global]\nstandalone = false\n")?;
        jail.create_file("auth.toml", "[global]\nauth = \"\"\n")?;

        for file in ["port.toml", "ssl.toml", "ttl.toml", "agents.toml", "auth.toml"] {
            let result = ConfigLoader::new()
                .with_config_path(jail.directory().join(file))
                .load();
            assert!(result.is_err(), "{file} should be rejected");
        }
        Ok(())
    });
}

#[test]
fn test_save_then_load_keeps_sections() {
    Jail::expect_with(|jail| {
        jail.create_file("bcon.toml", MULTI_AGENT_TOML)?;
        let loader = ConfigLoader::new().with_config_path(jail.directory().join("bcon.toml"));
        let original = loader.load().map_err(|e| e.to_string())?;

        let saved = jail.directory().join("saved.toml");
        loader
            .save_to_file(&original, &saved)
            .map_err(|e| e.to_string())?;
        let reloaded = ConfigLoader::new()
            .with_config_path(&saved)
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(reloaded, original);
        Ok(())
    });
}
