use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const SCHEMA: &str = r#"{
  "swagger": "2.0",
  "paths": {
    "/pet/{petId}": {
      "get": {"summary": "Find pet", "operationId": "getPetById", "tags": ["pet"]},
      "delete": {"summary": "Delete pet", "operationId": "deletePet", "tags": ["pet"]}
    },
    "/store/order": {
      "post": {"summary": "Place order", "operationId": "placeOrder", "tags": ["store"]}
    }
  }
}"#;

fn stencil(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_stencil"))
        .current_dir(dir)
        .arg("--store")
        .arg(dir.join("storage.json"))
        .args(args)
        .output()
        .expect("failed to run stencil");
    assert!(
        output.status.success(),
        "stencil {:?} failed:\n{}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn import_then_render_with_custom_template() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("swagger.json"), SCHEMA).unwrap();
    fs::write(dir.join("code.tpl"), "$apiMethod$ $apiPath$").unwrap();

    stencil(dir, &["import", "swagger.json"]);
    stencil(dir, &["templates", "add", "--name", "short", "--code-file", "code.tpl"]);

    let out = stencil(dir, &["render", "--selector", "pet"]);
    assert_eq!(
        stdout(&out),
        "get /pet/${params.petId}\n\n\n\ndelete /pet/${params.petId}\n\n\n\n"
    );

    let out = stencil(dir, &["render", "--url", "http://localhost/#/store/placeOrder"]);
    assert_eq!(stdout(&out), "post /store/order\n\n\n\n");
}

#[test]
fn render_limit_is_persisted() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("swagger.json"), SCHEMA).unwrap();
    fs::write(dir.join("code.tpl"), "$apiOperationId$").unwrap();

    stencil(dir, &["import", "swagger.json"]);
    stencil(dir, &["templates", "add", "--code-file", "code.tpl"]);
    stencil(dir, &["limit", "1"]);

    let out = stencil(dir, &["render"]);
    assert_eq!(stdout(&out), "getPetById\n\n\n\n");
}

#[test]
fn builtin_template_cannot_be_deleted() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    let output = Command::new(env!("CARGO_BIN_EXE_stencil"))
        .current_dir(dir)
        .arg("--store")
        .arg(dir.join("storage.json"))
        .args(["templates", "delete", "--", "-1"])
        .output()
        .expect("failed to run stencil");
    assert!(!output.status.success());

    let list = stencil(dir, &["templates", "list"]);
    assert!(stdout(&list).contains("* -1"));
}

#[test]
fn import_stores_the_document_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(
        dir.join("swagger.json"),
        r#"{"paths": {"/p/{id}": {"parameters": [{"name": "id", "in": "path"}], "get": {"operationId": "g"}}}}"#,
    )
    .unwrap();

    stencil(dir, &["import", "swagger.json"]);

    let storage = fs::read_to_string(dir.join("storage.json")).unwrap();
    let storage: serde_json::Value = serde_json::from_str(&storage).unwrap();
    let stored = storage["swaggerData"].as_str().expect("swaggerData is a JSON string");
    let stored: serde_json::Value = serde_json::from_str(stored).unwrap();
    assert!(stored["paths"]["/p/{id}"]["parameters"].is_array());
    assert!(stored["paths"]["/p/{id}"]["get"].get("tags").is_none());
}

#[test]
fn init_and_completions_skip_storage() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    stencil(dir, &["init"]);
    assert!(dir.join(".stencil.yaml").exists());

    let out = stencil(dir, &["completions", "bash"]);
    assert!(stdout(&out).contains("stencil"));
    assert!(!dir.join("storage.json").exists());
}
