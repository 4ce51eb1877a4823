use clap::Parser;
use envtree::cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn test_parse_show() {
    let cli = Cli::try_parse_from(["envtree", "show", "redis"]).unwrap();

    match cli.command {
        Commands::Show { name } => assert_eq!(name, "redis"),
        _ => panic!("Wrong command"),
    }
    assert!(!cli.json);
    assert!(cli.resolve.prefix.is_none());
    assert!(cli.resolve.schema.is_none());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "envtree",
        "vars",
        "database",
        "--json",
        "--prefix",
        "PG_",
        "--separator",
        "-",
        "--max-depth",
        "2",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Vars { ref name } if name == "database"));
    assert!(cli.json);
    assert_eq!(cli.resolve.prefix.as_deref(), Some("PG_"));
    assert_eq!(cli.resolve.separator.as_deref(), Some("-"));
    assert_eq!(cli.resolve.max_depth, Some(2));
}

#[test]
fn test_schema_and_config_files() {
    let cli = Cli::try_parse_from([
        "envtree",
        "--schema",
        "schemas/app.yaml",
        "--config",
        "tool.yaml",
        "extras",
        "app",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Extras { ref name } if name == "app"));
    assert_eq!(cli.resolve.schema, Some(PathBuf::from("schemas/app.yaml")));
    assert_eq!(cli.config, Some(PathBuf::from("tool.yaml")));
}

#[test]
fn test_name_is_required() {
    assert!(Cli::try_parse_from(["envtree", "show"]).is_err());
}

#[test]
fn test_max_depth_must_be_a_number() {
    assert!(Cli::try_parse_from(["envtree", "show", "redis", "--max-depth", "deep"]).is_err());
}

#[test]
fn test_unknown_command() {
    assert!(Cli::try_parse_from(["envtree", "export", "redis"]).is_err());
}
