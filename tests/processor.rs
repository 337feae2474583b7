use def_transform::processor::{collect_json_files, process_files, run, stdout_listing, RunOptions};
use def_transform::transformations::{RemoveField, SetField};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn collects_json_files_recursively() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("a.json"), &json!({}));
    write_json(&dir.path().join("nested/b.JSON"), &json!({}));
    fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let files = collect_json_files(dir.path(), None).unwrap();
    assert_eq!(files.len(), 2);
    assert!(collect_json_files(&dir.path().join("missing"), None).is_err());
}

#[test]
fn rewrites_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("api.json");
    write_json(
        &file,
        &json!({
            "swagger": "2.0",
            "definitions": {
                "Pet": {"type": "object", "example": {}},
                "Tag": {"type": "object"}
            }
        }),
    );

    let t = RemoveField {
        field: "example".to_string(),
        verbose: false,
    };
    run(&file, &t, &RunOptions::default()).unwrap();

    let out = read_json(&file);
    assert_eq!(out["swagger"], json!("2.0"));
    assert_eq!(out["definitions"]["Pet"], json!({"type": "object"}));
    assert_eq!(out["definitions"]["Tag"], json!({"type": "object"}));
}

#[test]
fn output_directory_mirrors_input_tree() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let nested = input.path().join("v1/models.json");
    write_json(&nested, &json!({"Pet": {}, "Tag": {}}));

    let t = SetField {
        field: "x-internal".to_string(),
        value: json!(true),
        verbose: false,
    };
    let options = RunOptions {
        output_dir: Some(output.path().to_path_buf()),
        only: vec!["Tag".to_string()],
        ..RunOptions::default()
    };
    run(input.path(), &t, &options).unwrap();

    assert_eq!(read_json(&nested), json!({"Pet": {}, "Tag": {}}));
    assert_eq!(
        read_json(&output.path().join("v1/models.json")),
        json!({"Pet": {}, "Tag": {"x-internal": true}})
    );
}

#[test]
fn invalid_files_fail_the_run_without_stopping_others() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    write_json(&dir.path().join("good.json"), &json!({"Pet": {}}));

    let t = SetField {
        field: "seen".to_string(),
        value: json!(1),
        verbose: false,
    };
    let err = run(dir.path(), &t, &RunOptions::default()).unwrap_err();
    assert!(err.to_string().contains("1 of 2"));
    assert_eq!(read_json(&dir.path().join("good.json")), json!({"Pet": {"seen": 1}}));
}

#[test]
fn output_directory_inside_input_is_not_rescanned() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("api.json"), &json!({"Pet": {}}));
    let out = dir.path().join("out");

    let t = SetField {
        field: "seen".to_string(),
        value: json!(true),
        verbose: false,
    };
    let options = RunOptions {
        output_dir: Some(out.clone()),
        ..RunOptions::default()
    };
    run(dir.path(), &t, &options).unwrap();
    run(dir.path(), &t, &options).unwrap();

    assert!(out.join("api.json").exists());
    assert!(!out.join("out").exists());
    assert_eq!(collect_json_files(dir.path(), Some(&out)).unwrap().len(), 1);
    // Output equal to the input directory is in-place mode.
    assert_eq!(collect_json_files(dir.path(), Some(dir.path())).unwrap().len(), 2);
}

#[test]
fn stdout_mode_renders_in_file_order_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    write_json(&a, &json!({"A": {}}));
    write_json(&b, &json!({"definitions": {"B": {}}}));

    let t = SetField {
        field: "x".to_string(),
        value: json!(1),
        verbose: false,
    };
    let options = RunOptions {
        stdout: true,
        ..RunOptions::default()
    };
    let rendered: Vec<(std::path::PathBuf, String)> = process_files(dir.path(), &t, &options)
        .unwrap()
        .into_iter()
        .map(|(path, result)| (path, result.unwrap()))
        .collect();

    assert_eq!(rendered[0].0, a);
    assert_eq!(rendered[1].0, b);
    assert_eq!(read_json(&a), json!({"A": {}}));
    assert_eq!(read_json(&b), json!({"definitions": {"B": {}}}));

    let listing = stdout_listing(&rendered);
    let a_marker = format!("// FILE: {}\n", a.display());
    let b_marker = format!("// FILE: {}\n", b.display());
    assert!(listing.starts_with(&a_marker));
    let b_at = listing.find(&b_marker).unwrap();
    let a_body: Value = serde_json::from_str(&listing[a_marker.len()..b_at]).unwrap();
    let b_body: Value = serde_json::from_str(&listing[b_at + b_marker.len()..]).unwrap();
    assert_eq!(a_body, json!({"A": {"x": 1}}));
    assert_eq!(b_body, json!({"definitions": {"B": {"x": 1}}}));
}

#[test]
fn in_place_rewrite_keeps_top_level_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("api.json");
    fs::write(
        &file,
        r#"{"swagger": "2.0", "definitions": {"Pet": {}}, "paths": {}}"#,
    )
    .unwrap();

    let t = SetField {
        field: "x".to_string(),
        value: json!(1),
        verbose: false,
    };
    run(&file, &t, &RunOptions::default()).unwrap();

    let out = read_json(&file);
    let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["swagger", "definitions", "paths"]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
