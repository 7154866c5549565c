//! Handler tests against JSON documents written to a temporary directory.

use std::io::Write;
use std::sync::Arc;

use pix_cli::inspect::{discover, run_inspect, InspectArgs};
use pix_cli::objectify::{run_objectify, ObjectifyArgs};
use pix_core::{Factory, TypeRegistry};

fn write_doc(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn factory() -> Factory {
    Factory::with_registry(Arc::new(TypeRegistry::new()))
}

#[test]
fn inspect_and_objectify_succeed_on_valid_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(
        &dir,
        "shots.json",
        r#"{"results": [{"class": "PIXShot", "name": "sh010"}]}"#,
    );

    let code = run_inspect(
        &InspectArgs {
            file: file.clone(),
            shallow: false,
        },
        &factory(),
    )
    .unwrap();
    assert_eq!(code, 0);

    let code = run_objectify(&ObjectifyArgs { file, json: true }, &factory()).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn loaded_document_is_discovered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(
        &dir,
        "playlist.json",
        r#"{"class": "PIXPlaylist", "items": [{"class": "PIXShot"}, {"class": "PIXClip"}]}"#,
    );
    let document = pix_cli::load_document(&file).unwrap();
    let names: Vec<String> = discover(&factory(), &document, true)
        .unwrap()
        .iter()
        .map(|o| o.type_name().to_string())
        .collect();
    assert_eq!(names, vec!["PIXPlaylist", "PIXShot", "PIXClip"]);
}

#[test]
fn invalid_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "broken.json", "{ nope");
    let err = run_inspect(
        &InspectArgs {
            file,
            shallow: false,
        },
        &factory(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("is not valid JSON"));
}
