use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn client_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("usb-hid-client").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Use a rooted device as a USB keyboard"))
        .stdout(predicate::str::contains("provision"));
}

#[test]
fn type_dry_run_prints_backend_commands() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .args(["type", "--dry-run", "Hi\""])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "echo \"h\" --left-shift | hid-gadget /dev/hidg0 keyboard",
        ))
        .stdout(predicate::str::contains(
            "echo \"i\" | hid-gadget /dev/hidg0 keyboard",
        ))
        .stdout(predicate::str::contains(
            "echo \"\\\"\" | hid-gadget /dev/hidg0 keyboard",
        ));
}

#[test]
fn type_reads_stdin_and_honours_config() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("usb-hid-client");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[device]\nkeyboard_path = \"/dev/hidg1\"\n\n[dispatch]\nbackend = \"/data/local/tmp/hid-gadget\"\n",
    )
    .unwrap();

    client_cmd(&temp)
        .args(["type", "--dry-run"])
        .write_stdin("a\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "echo \"a\" | /data/local/tmp/hid-gadget /dev/hidg1 keyboard",
        ))
        .stdout(predicate::str::contains(
            "echo \"enter\" | /data/local/tmp/hid-gadget /dev/hidg1 keyboard",
        ));
}

#[test]
fn type_reports_unsupported_characters() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .args(["type", "--dry-run", "aéb"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("echo \"b\""))
        .stderr(predicate::str::contains("1 event(s) could not be sent"));
}

#[test]
fn type_keeps_going_past_invalid_utf8() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .args(["type", "--dry-run"])
        .write_stdin(vec![b'a', 0xff, b'b'])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "echo \"a\" | hid-gadget /dev/hidg0 keyboard",
        ))
        .stdout(predicate::str::contains(
            "echo \"b\" | hid-gadget /dev/hidg0 keyboard",
        ))
        .stderr(predicate::str::contains("1 event(s) could not be sent"));
}

#[test]
fn key_dry_run_sends_function_key() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .args(["key", "131", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "echo \"f1\" | hid-gadget /dev/hidg0 keyboard",
        ));
}

#[test]
fn key_rejects_unknown_code() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .args(["key", "999999", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no HID key"));
}

#[test]
fn gadget_writes_press_and_release_reports() {
    let temp = TempDir::new().unwrap();
    let device = temp.path().join("hidg0");
    std::fs::write(&device, b"").unwrap();

    client_cmd(&temp)
        .arg("gadget")
        .arg(&device)
        .arg("keyboard")
        .write_stdin("a --left-shift\nenter\nnot-a-key\n")
        .assert()
        .success();

    let bytes = std::fs::read(&device).unwrap();
    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[..8], &[0x02, 0, 0x04, 0, 0, 0, 0, 0]);
    assert_eq!(&bytes[8..16], &[0; 8]);
    assert_eq!(&bytes[16..24], &[0, 0, 0x28, 0, 0, 0, 0, 0]);
}

#[test]
fn gadget_only_supports_keyboard() {
    let temp = TempDir::new().unwrap();
    client_cmd(&temp)
        .args(["gadget", "/dev/null", "mouse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn init_config_writes_defaults_once() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.toml");

    client_cmd(&temp)
        .arg("--config")
        .arg(&path)
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("keyboard_path = \"/dev/hidg0\""));

    client_cmd(&temp)
        .arg("--config")
        .arg(&path)
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
