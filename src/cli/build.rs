//! `assetman build`: compile the host page and report what was published.
//!
//! Phases:
//! - **Clean** - remove the output directory when `--clean` is set
//! - **Compile** - every bundle selects, builds and publishes its resources
//! - **Report** - grouped urls and routes (text or JSON)

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use assetman::bundle::CompiledAssets;
use assetman::config::AssetConfig;
use assetman::logger::plural_count;
use assetman::{debug, log};

use super::BuildArgs;

/// Build every configured bundle.
pub fn build_assets(config: &AssetConfig, args: &BuildArgs) -> Result<()> {
    let start = Instant::now();
    let output = &config.build.output;

    if args.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clean `{}`", output.display()))?;
        debug!("build"; "removed {}", output.display());
    }

    let mut page = config.hostpage();
    let assets = page.compile().context("asset build failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(assets).context("failed to serialize assets")?;
        println!("{json}");
    } else {
        report(assets);
    }

    log!(
        "build";
        "done in {:.2}s ({})",
        start.elapsed().as_secs_f64(),
        if config.build.minify { "minified" } else { "sources" }
    );
    Ok(())
}

/// Print published urls per extension, then the route table.
fn report(assets: &CompiledAssets) {
    for (extension, entries) in &assets.groups {
        let urls: usize = entries.iter().map(|e| e.paths.len()).sum();
        log!("publish"; "{extension}: {}", plural_count(urls, "url"));
        for entry in entries {
            for url in &entry.paths {
                println!("  {url}");
            }
        }
    }

    if !assets.modules.is_empty() {
        log!("modules"; "{}", assets.modules.join(", "));
    }

    let routes: Vec<_> = assets.routes().collect();
    log!("routes"; "{}", plural_count(routes.len(), "route"));
    for route in routes {
        debug!("routes"; "GET {} -> {}", route.path, route.file.display());
    }
}
