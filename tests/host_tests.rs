use cartconf::config::{ConfigHost, Settings};
use cartconf::host::CliHost;

#[test]
fn test_cli_host_counts_notifications() {
    let mut host = CliHost::default();
    host.on_config_changed(&Settings::default());
    host.on_config_changed(&Settings::default());
    host.on_reset_to_defaults();

    assert_eq!(host.changes, 2);
    assert_eq!(host.resets, 1);
}

#[test]
fn test_open_manager_notifies_host() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let manager = cartconf::cli::open_manager(cartconf::config::DirFs::new(dir.path()));

    assert_eq!(manager.host().resets, 1);
    assert!(manager.host().changes >= 1);
}
