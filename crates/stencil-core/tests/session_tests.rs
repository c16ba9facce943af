use stencil_core::Selector;
use stencil_core::parse;
use stencil_core::session::Session;
use stencil_core::store::{FileStore, SWAGGER_DATA, Store};
use stencil_core::template::TemplateEdit;
use stencil_core::worker::{Worker, WorkerRequest};

const PETSTORE: &str = include_str!("fixtures/petstore-swagger2.json");

#[test]
fn file_store_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("storage.json"));

    let mut session = Session::load(&store).unwrap();
    session.set_document(parse::document_from_json(PETSTORE).unwrap());
    session.save_schema(&mut store).unwrap();

    let id = session.templates.add();
    session
        .templates
        .update(
            &id,
            TemplateEdit {
                name: Some("ids".to_string()),
                code: Some("$apiOperationId$".to_string()),
                header: None,
            },
        )
        .unwrap();
    session.save_templates(&mut store).unwrap();

    let reloaded = Session::load(&store).unwrap();
    assert_eq!(reloaded.templates.active().name, "ids");
    let out = reloaded.render(&Selector::parse("store"));
    assert_eq!(out.codes, vec!["placeOrder", "getOrderById", "deleteOrder"]);

    store.clear().unwrap();
    let cleared = Session::load(&store).unwrap();
    assert!(cleared.schema.is_none());
    assert!(cleared.templates.active().is_builtin());
}

#[test]
fn worker_matches_direct_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("storage.json"));
    let mut session = Session::load(&store).unwrap();
    session.schema = Some(parse::from_json(PETSTORE).unwrap());
    session.save_schema(&mut store).unwrap();

    let selector = Selector::parse("pet");
    let expected = session.render(&selector);

    let worker = Worker::spawn();
    let output = worker
        .request(WorkerRequest::Process {
            schema: session.schema.clone().unwrap(),
            selector,
            template: session.templates.active().clone(),
        })
        .unwrap();
    assert_eq!(output, expected);
    assert_eq!(output.totals, 7);
}

#[test]
fn stored_schema_is_the_raw_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("storage.json"));
    let mut session = Session::load(&store).unwrap();
    let document = parse::document_from_json(PETSTORE).unwrap();
    session.set_document(document.clone());
    session.save_schema(&mut store).unwrap();

    let stored = store.get(&[SWAGGER_DATA]).unwrap();
    let json = stored[SWAGGER_DATA].as_str().expect("schema is stored as a JSON string");
    let raw: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(raw, document.raw);
    assert!(raw["paths"]["/pet/{petId}"]["parameters"].is_array());
    assert!(raw["paths"]["/pet"]["put"]["parameters"].is_null());
    assert!(raw["definitions"]["Pet"].is_object());

    let reloaded = Session::load(&store).unwrap();
    assert_eq!(reloaded.raw_schema, Some(document.raw));
    assert_eq!(reloaded.schema, Some(document.schema));
}
