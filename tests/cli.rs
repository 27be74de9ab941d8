use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;

fn vmbatch() -> assert_cmd::Command {
    cargo_bin_cmd!("vmbatch").into()
}

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let config_path = dir.path().join("vmbatch.toml");
    let mut f = std::fs::File::create(&config_path).unwrap();
    write!(f, "{contents}").unwrap();
    config_path
}

#[test]
fn help_works() {
    vmbatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provision a batch of VMs"));
}

#[test]
fn missing_config_shows_error() {
    vmbatch()
        .args(["--config", "/nonexistent/vmbatch.toml", "images"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn validation_rejects_zero_count() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, "count = 0\n");

    vmbatch()
        .args(["--config", config_path.to_str().unwrap(), "images"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count must be at least 1"));
}

#[test]
fn up_rejects_invalid_override_before_connecting() {
    vmbatch()
        .args(["up", "--count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count must be at least 1"));
}

#[test]
fn images_lists_only_qcow2() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["base.qcow2", "other.img", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }

    vmbatch()
        .args(["images", "--image-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. base.qcow2"))
        .stdout(predicate::str::contains("other.img").not())
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn images_empty_dir() {
    let dir = tempfile::tempdir().unwrap();

    vmbatch()
        .args(["images", "--image-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No qcow2 images"));
}

#[test]
fn images_missing_dir_fails() {
    vmbatch()
        .args(["images", "--image-dir", "/nonexistent/images"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading image directory"));
}

#[test]
fn xml_prints_descriptor() {
    vmbatch()
        .args(["xml", "vm_9", "--disk", "/var/lib/libvirt/images/vm_9.qcow2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<name>vm_9</name>"))
        .stdout(predicate::str::contains("<memory unit='MiB'>512</memory>"))
        .stdout(predicate::str::contains(
            "<source file='/var/lib/libvirt/images/vm_9.qcow2'/>",
        ));
}

#[test]
fn xml_uses_config_resources() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(
        &dir,
        r#"
[resources]
memory_mb = 1024
vcpus = 2
"#,
    );

    vmbatch()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "xml",
            "lab-1",
            "--disk",
            "/srv/lab-1.qcow2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<memory unit='MiB'>1024</memory>"))
        .stdout(predicate::str::contains("<vcpu placement='static'>2</vcpu>"));
}

#[test]
fn up_exits_1_when_hypervisor_unreachable() {
    vmbatch()
        .args(["up", "--uri", "bogus:///x", "--answer", "no"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to connect to the hypervisor"));
}

#[test]
fn up_json_output_keeps_progress_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("base.qcow2"), b"").unwrap();

    vmbatch()
        .args([
            "up",
            "--uri",
            "test:///default",
            "--count",
            "1",
            "--image-dir",
            dir.path().to_str().unwrap(),
            "--answer",
            "yes",
            "--answer",
            "1",
            "--output",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stdout(predicate::str::contains("\"started\""))
        .stdout(predicate::str::contains("[1/1]").not())
        .stderr(predicate::str::contains("[1/1] vm_1"));
}
