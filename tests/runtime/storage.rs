//! Integration tests for on-disk program assets and values

use carlo_engine::{AssetLoader, AssetLoaderFactory, Coordinates};
use carlo_foundation::{ErrorKind, Value};
use carlo_runtime::{DirectoryAssets, EngineConfig, Host, PROGRAM_EXTENSION, StoreActor, ValueStore};

#[test]
fn assets_live_beside_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssets::new(dir.path());
    assets.store("door", "actor\nend").unwrap();
    assets.store("lamp", "actor\nend").unwrap();

    assert_eq!(assets.root(), dir.path());
    assert_eq!(
        assets.path_of("door"),
        dir.path().join(format!("door.{PROGRAM_EXTENSION}"))
    );
    assert!(assets.path_of("lamp").exists());
}

#[test]
fn erasing_an_asset_leaves_loaded_programs_alone() {
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssets::new(dir.path());
    assets.store("door", "actor\nreceives Knock\nend\nend").unwrap();

    let mut host = Host::new(EngineConfig::default()).unwrap();
    assert!(host.load(&assets, &Coordinates::default(), "door", ""));
    host.programs()
        .erase(&assets, &Coordinates::default(), "door")
        .unwrap();

    assert!(!assets.path_of("door").exists());
    assert!(host.programs().is_loaded("door"));
    assert!(!host.load(&assets, &Coordinates::default(), "other", "door"));
}

#[test]
fn missing_assets_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssets::new(dir.path());
    let mut loader = assets.make_loader(&Coordinates::default(), "ghost");
    let error = loader.open().unwrap_err();
    assert!(matches!(error.kind, ErrorKind::AssetNotFound(ref name) if name == "ghost"));
}

#[test]
fn values_keep_their_shape_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = ValueStore::in_directory(dir.path()).unwrap();

    let mut record = Value::empty_map();
    record.set("name", "brass key").unwrap();
    record.set("weight", 0.5).unwrap();
    record.set("tags", vec!["small", "metal"]).unwrap();
    store.put(&StoreActor::key("chest", "contents"), &record).unwrap();

    let reopened = ValueStore::in_directory(dir.path()).unwrap();
    assert_eq!(reopened.get("chest.contents").unwrap(), record);
    assert!(reopened.remove("chest.contents").unwrap());
    assert!(!reopened.remove("chest.contents").unwrap());
}

#[test]
fn store_debug_names_the_backend() {
    assert_eq!(
        format!("{:?}", ValueStore::in_memory()),
        "ValueStore { backend: \"memory\" }"
    );
}
