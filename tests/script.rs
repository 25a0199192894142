use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn run_script(script: &str, args: &[&str]) -> String {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(script.as_bytes()).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_explorer"))
        .args(args)
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn runs_commands_from_script() {
    let out = run_script(
        "criad docs\ncriaa docs/a.txt 1024\nverset docs/a.txt\narvore\n",
        &[],
    );
    assert!(out.contains("Directory 'docs' created."));
    assert!(out.contains("Blocks of 'docs/a.txt': 11 12"));
    assert!(out.contains("Root\n|- docs/"));
}

#[test]
fn stops_at_sair() {
    let out = run_script("criad a\nsair\ncriad b\n", &[]);
    assert!(out.contains("Directory 'a' created."));
    assert!(!out.contains("Directory 'b' created."));
}

#[test]
fn honours_geometry_options() {
    let out = run_script(
        "mapa\ncriaa f 200\ncriaa g 200\n",
        &["-n", "8", "-r", "2", "-b", "64"],
    );
    assert!(out.contains("B B 0 0 0 0 0 0\nB-Boot 0-Free #-Used"));
    assert!(out.contains("File 'f' created."));
    assert!(out.contains("Error: Not enough space: 4 block(s) needed, 2 free"));
}

#[test]
fn rejects_invalid_geometry() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"verd\n").unwrap();
    for args in [
        &["-n", "4", "-r", "4"][..],
        &["-n", "14", "-r", "10", "-b", "18446744073709551615"][..],
    ] {
        let output = Command::new(env!("CARGO_BIN_EXE_explorer"))
            .args(args)
            .arg(file.path())
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1), "{args:?}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid disk geometry"), "{args:?}: {stderr}");
    }
}
