//! `assetman deps`: inspect component resolution.

use anyhow::{Context, Result};
use assetman::component;
use assetman::log;
use assetman::logger::plural_count;
use serde_json::json;

use super::DepsArgs;

/// Resolve `args.manifests` and print dependencies or main files.
pub fn list_dependencies(args: &DepsArgs) -> Result<()> {
    let resolved = component::resolve(&args.manifests).context("dependency resolution failed")?;

    let Some(ext) = &args.ext else {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
            return Ok(());
        }
        log!("resolve"; "{}", plural_count(resolved.len(), "component"));
        for dep in &resolved {
            let version = dep.version.as_deref().unwrap_or("?");
            println!("  {}@{} ({}) {}", dep.name, version, dep.range, dep.manifest_path.display());
        }
        return Ok(());
    };

    let files = component::collect(&resolved).context("failed to collect main files")?;
    let files = component::filter_by_extension(files, ext);

    if args.json {
        let paths: Vec<_> = files.iter().map(|f| f.path.display().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "ext": ext, "files": paths }))?);
        return Ok(());
    }

    let noun = format!(".{} file", ext.trim_start_matches('.'));
    log!("resolve"; "{}", plural_count(files.len(), &noun));
    for file in &files {
        println!("  {}", file.path.display());
    }
    Ok(())
}
