//! Command line parsing

use bcon::cli::KindArg;
use bcon::{Cli, Command, SettingsCommand};
use bcon_infrastructure::config::ConfigKind;
use clap::Parser;

#[test]
fn test_parse_clients_with_global_agent() {
    let cli = Cli::try_parse_from(["bcon", "-u", "alice", "-p", "secret", "clients", "--agent", "srv2"])
        .unwrap();
    assert_eq!(cli.command, Command::Clients);
    assert_eq!(cli.user.as_deref(), Some("alice"));
    assert_eq!(cli.password.as_deref(), Some("secret"));
    assert_eq!(cli.agent.as_deref(), Some("srv2"));
}

#[test]
fn test_parse_running_for_one_client() {
    let cli = Cli::try_parse_from(["bcon", "running", "--client", "c2"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Running {
            client: Some("c2".to_string())
        }
    );
    assert!(cli.agent.is_none());
}

#[test]
fn test_parse_settings_delete_flags() {
    let cli = Cli::try_parse_from(["bcon", "settings", "delete", "c1", "--revoke"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Settings(SettingsCommand::Delete {
            name: "c1".to_string(),
            revoke: true,
            delcert: false,
        })
    );
}

#[test]
fn test_parse_config_kind() {
    let cli =
        Cli::try_parse_from(["bcon", "config", "global", "auth", "--kind", "lower-list"]).unwrap();
    let Command::Config { section, key, kind } = cli.command else {
        panic!("expected config command");
    };
    assert_eq!((section.as_str(), key.as_str()), ("global", "auth"));
    assert_eq!(ConfigKind::from(kind), ConfigKind::StringLowerList);
    assert_eq!(ConfigKind::from(KindArg::String), ConfigKind::String);
}

#[test]
fn test_missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["bcon", "--user", "admin"]).is_err());
}

#[test]
fn test_only_console_commands_need_a_principal() {
    assert!(Command::Clients.needs_principal());
    assert!(Command::Settings(SettingsCommand::Options).needs_principal());
    assert!(!Command::Plugins.needs_principal());
    assert!(
        !Command::Config {
            section: "global".to_string(),
            key: "port".to_string(),
            kind: KindArg::Integer,
        }
        .needs_principal()
    );
}
