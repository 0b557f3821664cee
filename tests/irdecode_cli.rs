use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn irdecode_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_irdecode").expect("irdecode test binary not built")
}

#[test]
fn help_mentions_capture_flags() {
    let output = Command::new(irdecode_bin())
        .arg("--help")
        .output()
        .expect("run irdecode --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("--remote"));
    assert!(combined.contains("--lirc-device"));
    assert!(combined.contains("--database"));
}

#[test]
fn missing_remote_is_a_usage_error() {
    let output = Command::new(irdecode_bin())
        .arg("lircd.conf")
        .output()
        .expect("run irdecode without --remote");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("--remote"));
}

#[test]
fn database_with_plain_remote_name_is_rejected() {
    let output = Command::new(irdecode_bin())
        .args(["--remote", "aircon", "--database", "ir.sqlite", "lircd.conf"])
        .output()
        .expect("run irdecode with a plain remote name");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("<location>.<device_type>"));
}
