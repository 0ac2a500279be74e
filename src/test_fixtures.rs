//! Filesystem fixtures shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serde_json::{Map, Value, json};

/// Write a manifest file with the given fields and return its path.
pub fn write_manifest(
    dir: &Path,
    file_name: &str,
    name: &str,
    version: Option<&str>,
    deps: &[(&str, &str)],
    main: &[&str],
) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let mut dependencies = Map::new();
    for (dep, range) in deps {
        dependencies.insert((*dep).to_string(), Value::String((*range).to_string()));
    }

    let mut manifest = json!({
        "name": name,
        "dependencies": dependencies,
        "main": main,
    });
    if let Some(version) = version {
        manifest["version"] = Value::String(version.to_string());
    }

    let path = dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(&manifest).unwrap()).unwrap();
    path
}

/// Install a component under `components/<name>` with its main files.
///
/// `mains` pairs a relative path with its content. Returns the manifest path.
pub fn install_component(
    components: &Path,
    name: &str,
    version: Option<&str>,
    deps: &[(&str, &str)],
    mains: &[(&str, &str)],
) -> PathBuf {
    let dir = components.join(name);
    for (rel, content) in mains {
        write_file(&dir.join(rel), content);
    }
    let main: Vec<&str> = mains.iter().map(|(rel, _)| *rel).collect();
    write_manifest(&dir, "bower.json", name, version, deps, &main)
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Sleep long enough for the next write to get a distinct mtime.
pub fn tick() {
    thread::sleep(Duration::from_millis(20));
}
