use super::AppConfig;
use clap::Parser;
use std::time::Duration;

fn base_config(extra: &[&str]) -> AppConfig {
    let mut argv = vec!["irdecode", "--remote", "livingroom.aircon"];
    argv.extend_from_slice(extra);
    argv.push("lircd.conf");
    AppConfig::parse_from(argv)
}

#[test]
fn accepts_minimal_arguments() {
    let cfg = base_config(&[]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.lirc_device, "/dev/lirc0");
    assert_eq!(cfg.mode2_cmd, "mode2");
    assert!(!cfg.overwrite);
}

#[test]
fn rejects_empty_remote() {
    let cfg = AppConfig::parse_from(["irdecode", "--remote", "  ", "lircd.conf"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_remote_with_path_separator() {
    let cfg = AppConfig::parse_from(["irdecode", "--remote", "../etc", "lircd.conf"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn database_requires_location_dot_device_type() {
    let cfg = AppConfig::parse_from([
        "irdecode",
        "--remote",
        "aircon",
        "--database",
        "ir.sqlite",
        "lircd.conf",
    ]);
    assert!(cfg.validate().is_err());

    let cfg = base_config(&["--database", "ir.sqlite"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_timeout_above_cap() {
    let cfg = base_config(&["--timeout-secs", "3601"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_timeout_means_wait_for_ctrl_c() {
    let cfg = base_config(&[]);
    assert_eq!(cfg.capture_timeout(), None);

    let cfg = base_config(&["--timeout-secs", "30"]);
    assert_eq!(cfg.capture_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn mode2_cmd_splits_shell_style() {
    let cfg = base_config(&["--mode2-cmd", "mode2 --driver default"]);
    assert_eq!(
        cfg.mode2_argv().unwrap(),
        vec!["mode2", "--driver", "default"]
    );
}

#[test]
fn rejects_unbalanced_mode2_cmd_quoting() {
    let cfg = base_config(&["--mode2-cmd", "mode2 'unterminated"]);
    assert!(cfg.mode2_argv().is_err());
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_empty_mode2_cmd() {
    let cfg = base_config(&["--mode2-cmd", ""]);
    assert!(cfg.validate().is_err());
}
