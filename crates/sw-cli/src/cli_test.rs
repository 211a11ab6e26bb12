use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_generate_repeatable_globs() {
    let cli = Cli::try_parse_from([
        "sqlwrap",
        "-p",
        "proj",
        "generate",
        "--ddl",
        "a/*.sql",
        "--ddl",
        "b/*.sql",
        "--dml",
        "q/*.sql",
        "-o",
        "out",
    ])
    .unwrap();
    assert_eq!(cli.global.project_dir, "proj");
    match cli.command {
        Commands::Generate(args) => {
            assert_eq!(args.schema.ddl, vec!["a/*.sql", "b/*.sql"]);
            assert_eq!(args.dml, vec!["q/*.sql"]);
            assert_eq!(args.output_dir.as_deref(), Some("out"));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["sqlwrap", "tables", "--verbose", "--log-level", "trace"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.log_level, Some(LogLevel::Trace));
}

#[test]
fn test_describe_requires_file() {
    assert!(Cli::try_parse_from(["sqlwrap", "describe"]).is_err());
}
