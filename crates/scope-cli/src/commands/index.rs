use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use scope_core::Species;
use scope_data::Config;
use scope_search::SearchIndex;

pub fn show_index(config: &Config, dataset: &Path, cross_species: Option<Species>) -> Result<()> {
    let search = super::open_engine(config)?;
    let identity = super::dataset_identity(config, dataset);

    let started = Instant::now();
    let index = search
        .index(&identity, cross_species)
        .with_context(|| format!("Failed to index {}", identity))?;
    let elapsed = started.elapsed();

    println!("\nSearch index for {}\n", identity);
    print!("{}", render_summary(&index));
    println!("\n  Built in {:.1?}", elapsed);

    Ok(())
}

fn render_summary(index: &SearchIndex) -> String {
    let mode = match index.cross_species() {
        Some(pair) => format!("cross-species ({})", pair),
        None => "native".to_string(),
    };

    let mut lines = vec![
        format!("  Species: {} ({})", index.species().label(), index.species()),
        format!("  Mode: {}", mode),
        format!("  Entries: {}", index.len()),
    ];
    for (category, count) in index.category_counts() {
        lines.push(format!("    {:<24} {:>6}", category.to_string(), count));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
