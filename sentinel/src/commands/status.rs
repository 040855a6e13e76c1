// sentinel/src/commands/status.rs
//
// USE CASE: Print the pipeline health summary (CI-friendly with --check).

use comfy_table::{Cell, Color, Table, presets::UTF8_FULL};
use std::path::Path;

use sentinel_core::application::{QualityDashboard, Section};
use sentinel_core::domain::quality::QualityFilter;

pub async fn execute(config_dir: &Path, check: bool) -> anyhow::Result<()> {
    let (_config, service) = super::bootstrap(config_dir)?;
    let page = service.quality_page(QualityFilter::default()).await;

    println!("\n🩺 {} pipeline health", page.title);
    println!("{}", summary_table(&page));

    println!("\n💡 Recommendations");
    for rec in &page.recommendations {
        println!("   {} {}", rec.icon(), rec);
    }

    if check && !page.is_healthy() {
        eprintln!(
            "\n❌ Health check failed: quality {} / freshness {}",
            page.score.rating_label(),
            page.freshness
                .as_ref()
                .map_or("UNKNOWN", |f| f.status.as_str())
        );
        std::process::exit(1);
    }
    Ok(())
}

fn summary_table(page: &QualityDashboard) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Indicator", "Value"]);

    let rating_color = if page.is_healthy() { Color::Green } else { Color::Yellow };
    let score = match page.score.rating {
        Some(_) => format!("{:.1}%", page.score.score),
        None => "n/a".to_string(),
    };
    table.add_row(vec![Cell::new("Quality score"), Cell::new(score)]);
    table.add_row(vec![
        Cell::new("Rating"),
        Cell::new(page.score.rating_label()).fg(rating_color),
    ]);
    table.add_row(vec![
        Cell::new("Checks (excellent / good / attention)"),
        Cell::new(format!(
            "{} ({} / {} / {})",
            page.score.total, page.score.excellent, page.score.good, page.score.needs_attention
        )),
    ]);

    let freshness = match &page.freshness {
        Some(f) => format!("{} ({} min since last load)", f.status, f.minutes_since_load),
        None => "UNKNOWN".to_string(),
    };
    table.add_row(vec![Cell::new("Freshness"), Cell::new(freshness)]);

    table.add_row(vec![
        Cell::new("Monitoring functions"),
        Cell::new(section_text(&page.functions, |fs| {
            let running = fs.iter().filter(|f| f.is_running()).count();
            format!("{} running / {} attached", running, fs.len())
        })),
    ]);
    table.add_row(vec![
        Cell::new("Data metric results"),
        Cell::new(section_text(&page.checks, |cs| format!("{} rows", cs.len()))),
    ]);
    table
}

fn section_text<T>(section: &Section<T>, ready: impl Fn(&T) -> String) -> String {
    match section {
        Section::Ready(value) => ready(value),
        Section::Empty => "none".to_string(),
        Section::Failed(err) => format!("❌ {}", err),
    }
}
