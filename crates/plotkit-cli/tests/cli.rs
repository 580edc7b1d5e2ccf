use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn plotkit() -> Command {
    Command::cargo_bin("plotkit").unwrap()
}

#[test]
fn test_dialects_lists_every_name() {
    plotkit()
        .arg("dialects")
        .assert()
        .success()
        .stdout(predicate::str::contains("HPGL"))
        .stdout(predicate::str::contains("DMPL6"))
        .stdout(predicate::str::contains("CAMMGLMode2"))
        .stdout(predicate::str::contains("GPGL"));
}

#[test]
fn test_encode_hpgl_to_stdout() {
    let dir = tempdir().unwrap();
    let profile = dir.path().join("cutter.json");
    let input = dir.path().join("shapes.json");
    std::fs::write(
        &profile,
        r#"{"name":"Desk cutter","ratio":1.0,"surfaceHeight":10.0,"protocol":"HPGL"}"#,
    )
    .unwrap();
    std::fs::write(&input, "[[[0,0],[10,0],[10,10]]]").unwrap();

    plotkit()
        .args(["encode", "--profile"])
        .arg(&profile)
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::eq("IN;PU0,10;PD10,10,10,0,0,10;"));
}

#[test]
fn test_encode_writes_output_file() {
    let dir = tempdir().unwrap();
    let profile = dir.path().join("cutter.toml");
    let input = dir.path().join("shapes.json");
    let output = dir.path().join("out.plt");
    std::fs::write(
        &profile,
        "name = \"Vinyl\"\nratio = 1.0\nsurfaceHeight = 0.0\nprotocol = \"GPGL\"\n",
    )
    .unwrap();
    std::fs::write(&input, "[[[0,0],[5,0],[5,5]]]").unwrap();

    plotkit()
        .args(["encode", "--profile"])
        .arg(&profile)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let stream = std::fs::read_to_string(&output).unwrap();
    assert!(stream.starts_with("\x1B\x04TT\x03"));
    assert!(stream.ends_with("H\x03"));
}

#[test]
fn test_encode_rejects_unknown_dialect() {
    let dir = tempdir().unwrap();
    let profile = dir.path().join("cutter.json");
    let input = dir.path().join("shapes.json");
    std::fs::write(&profile, r#"{"name":"Odd","protocol":"XYZ"}"#).unwrap();
    std::fs::write(&input, "[]").unwrap();

    plotkit()
        .args(["encode", "--profile"])
        .arg(&profile)
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported protocol"));
}

#[test]
fn test_preview_prints_polylines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cut.plt");
    std::fs::write(&input, "IN;PU0,0;PD40,0;").unwrap();

    plotkit()
        .arg("preview")
        .arg("--input")
        .arg(&input)
        .args(["--ratio", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[[0.0,-0.0],[0.0,-10.0]]]"));
}

#[test]
fn test_preview_rejects_zero_ratio() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cut.plt");
    std::fs::write(&input, "IN;PU0,0;PD40,0;").unwrap();

    plotkit()
        .arg("preview")
        .arg("--input")
        .arg(&input)
        .args(["--ratio", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ratio must be > 0"));
}
