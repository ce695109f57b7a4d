//! Integration tests for the cartconf command-line host.

use std::fs;

use cartconf::cli::{Cli, Commands, LogLevel, OutputFormat, read_cartridge, run_command};
use cartconf::config::CONFIG_FILE_NAME;
use cartconf::cart::Cartridge;
use clap::Parser;
use log::LevelFilter;
use tempfile::TempDir;

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    let mut out = Vec::new();
    run_command(&cli, &mut out).expect("command succeeds");
    String::from_utf8(out).expect("utf-8 output")
}

fn root_arg(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

#[test]
fn test_parse_show_with_format() {
    let cli = Cli::try_parse_from(["cartconf", "--root", "/tmp/x", "show", "--format", "yaml"])
        .expect("parses");
    assert_eq!(
        cli.command,
        Some(Commands::Show {
            format: OutputFormat::Yaml
        })
    );
    assert_eq!(cli.root.as_deref(), Some(std::path::Path::new("/tmp/x")));
    assert!(cli.log_filter().is_none());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["cartconf", "reset", "--log-level", "debug"]).expect("parses");
    assert_eq!(cli.command, Some(Commands::Reset));
    assert_eq!(cli.log_level, Some(LogLevel::Debug));
    assert_eq!(cli.log_filter(), Some(LevelFilter::Debug));
}

#[test]
fn test_parse_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["cartconf", "show", "--format", "toml"]).is_err());
    assert!(Cli::try_parse_from(["cartconf", "import"]).is_err());
}

#[test]
fn test_path_does_not_create_config() {
    let dir = TempDir::new().expect("temp dir");
    let out = run(&["cartconf", "--root", &root_arg(&dir), "path"]);

    assert_eq!(out.trim(), dir.path().join(CONFIG_FILE_NAME).display().to_string());
    assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
}

#[test]
fn test_default_command_shows_baseline_and_writes_config() {
    let dir = TempDir::new().expect("temp dir");
    let out = run(&["cartconf", "--root", &root_arg(&dir)]);

    assert!(out.contains("\"ui_scale\": 4"));
    assert!(out.contains("\"gif_length\": 20"));
    assert!(dir.path().join(CONFIG_FILE_NAME).exists());
}

#[test]
fn test_show_yaml() {
    let dir = TempDir::new().expect("temp dir");
    let out = run(&["cartconf", "--root", &root_arg(&dir), "show", "-f", "yaml"]);
    assert!(out.contains("ui_scale: 4"));
}

#[test]
fn test_import_script_then_show() {
    let dir = TempDir::new().expect("temp dir");
    let script = dir.path().join("custom.lua");
    fs::write(&script, "UI_SCALE = 3\nTHEME = { CODE = { SELECT = 9 } }").expect("write script");

    let out = run(&[
        "cartconf",
        "--root",
        &root_arg(&dir),
        "import",
        &script.to_string_lossy(),
    ]);
    assert!(out.contains("Config saved"));

    let shown = run(&["cartconf", "--root", &root_arg(&dir), "show"]);
    assert!(shown.contains("\"ui_scale\": 3"));
    assert!(shown.contains("\"select\": 9"));
    // Untouched fields keep their baseline values
    assert!(shown.contains("\"gif_length\": 20"));
}

#[test]
fn test_reset_discards_customization() {
    let dir = TempDir::new().expect("temp dir");
    let script = dir.path().join("custom.lua");
    fs::write(&script, "NO_SOUND = true UI_SCALE = 1").expect("write script");
    run(&["cartconf", "--root", &root_arg(&dir), "import", &script.to_string_lossy()]);

    let out = run(&["cartconf", "--root", &root_arg(&dir), "reset"]);
    assert!(out.contains("Config saved"));

    let shown = run(&["cartconf", "--root", &root_arg(&dir), "show"]);
    assert!(shown.contains("\"ui_scale\": 4"));
    assert!(shown.contains("\"no_sound\": false"));
}

#[test]
fn test_export_cartridge_round_trip() {
    let source = TempDir::new().expect("temp dir");
    let target = TempDir::new().expect("temp dir");
    let script = source.path().join("custom.lua");
    fs::write(&script, "GIF_SCALE = 5").expect("write script");
    run(&["cartconf", "--root", &root_arg(&source), "import", &script.to_string_lossy()]);

    let exported = source.path().join("export.tic");
    let out = run(&[
        "cartconf",
        "--root",
        &root_arg(&source),
        "export",
        &exported.to_string_lossy(),
    ]);
    assert!(out.contains("Exported config"));

    let cart = read_cartridge(&exported).expect("exported cartridge loads");
    assert_eq!(cart, Cartridge::with_code("GIF_SCALE = 5"));

    run(&["cartconf", "--root", &root_arg(&target), "import", &exported.to_string_lossy()]);
    let shown = run(&["cartconf", "--root", &root_arg(&target), "show"]);
    assert!(shown.contains("\"gif_scale\": 5"));
}

#[test]
fn test_export_script_writes_baseline_source() {
    let dir = TempDir::new().expect("temp dir");
    let exported = dir.path().join("baseline.lua");
    run(&["cartconf", "--root", &root_arg(&dir), "export", &exported.to_string_lossy()]);

    let code = fs::read_to_string(&exported).expect("read export");
    assert!(code.contains("GIF_LENGTH"));
    assert!(code.contains("THEME"));
}

#[test]
fn test_import_missing_file_fails() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.tic");
    let cli = Cli::try_parse_from([
        "cartconf",
        "--root",
        &root_arg(&dir),
        "import",
        &missing.to_string_lossy(),
    ])
    .expect("parses");

    let mut out = Vec::new();
    assert!(run_command(&cli, &mut out).is_err());
    assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
}
