// sentinel/src/commands/render.rs
//
// USE CASE: Render one dashboard to a static HTML file.

use anyhow::Context;
use std::path::Path;

use sentinel_core::application::PageKind;
use sentinel_core::domain::quality::QualityFilter;
use sentinel_core::infrastructure::fs::atomic_write;
use sentinel_core::presentation::{PageOptions, PageRenderer};

pub async fn execute(config_dir: &Path, page: PageKind, out: &Path) -> anyhow::Result<()> {
    let (config, service) = super::bootstrap(config_dir)?;
    let renderer = PageRenderer::new()?;
    let opts = PageOptions {
        interval_secs: config.refresh.interval_secs,
        ..PageOptions::default()
    };

    println!("🖼️  Rendering the {} dashboard...", page);
    let html = match page {
        PageKind::Quality => {
            let view = service.quality_page(QualityFilter::default()).await;
            renderer.quality(&view, &opts)?
        }
        PageKind::Risk => renderer.risk(&service.risk_page().await, &opts)?,
    };

    atomic_write(out, html).with_context(|| format!("Failed to write {:?}", out))?;
    println!("✨ Dashboard written to {}", out.display());
    Ok(())
}
