use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("openstack-lb-info").unwrap();
    for var in [
        "OS_CLOUD",
        "OS_AUTH_URL",
        "OS_USERNAME",
        "OS_PASSWORD",
        "OS_PROJECT_NAME",
        "OS_APPLICATION_CREDENTIAL_ID",
        "OS_APPLICATION_CREDENTIAL_SECRET",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn no_arguments_prints_help() {
    cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--max-workers"));
}

#[test]
fn type_is_required() {
    cmd()
        .args(["--details"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--type"));
}

#[test]
fn max_workers_out_of_range_is_rejected() {
    for value in ["0", "33", "many"] {
        cmd()
            .args(["-t", "lb", "--max-workers", value])
            .assert()
            .failure()
            .stderr(predicate::str::contains("between 1 and 32"));
    }
}

#[test]
fn invalid_uuid_filter_is_rejected() {
    cmd()
        .args(["-t", "lb", "--id", "lb-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid UUID"));
}

#[test]
fn invalid_vip_address_is_rejected() {
    cmd()
        .args(["-t", "amphora", "--vip-address", "10.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid IPv4 or IPv6 address"));
}

#[test]
fn unknown_output_format_is_rejected() {
    cmd()
        .args(["-t", "lb", "-o", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_credentials_fail_with_error() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[api]\nrequest_timeout_secs = 1").unwrap();

    cmd()
        .args(["-t", "lb", "--os-cloud", "envvars", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("OS_AUTH_URL"));
}

#[test]
fn broken_explicit_config_fails() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[defaults]\nmax_workers = \"lots\"").unwrap();

    cmd()
        .args(["-t", "lb", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config parsing failed"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn zero_request_timeout_in_config_fails() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[api]\nrequest_timeout_secs = 0").unwrap();

    cmd()
        .args(["-t", "lb", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for request_timeout_secs"));
}
