use anyhow::{Context, Result};
use std::path::Path;

use scope_data::Config;
use scope_search::FeatureColumns;

pub fn run_lookup(config: &Config, dataset: &Path, query: &str, json: bool) -> Result<()> {
    let search = super::open_engine(config)?;
    let identity = super::dataset_identity(config, dataset);

    let result = search
        .lookup_features(&identity, query)
        .with_context(|| format!("Lookup of '{}' in {} failed", query, identity))?;
    let columns = result.columns();

    if json {
        println!("{}", serde_json::to_string_pretty(&columns)?);
    } else if columns.features.is_empty() {
        println!("No features match '{}'", query);
    } else {
        print!("{}", render_table(&columns));
        println!("\n{} feature(s)", columns.features.len());
    }

    Ok(())
}

/// Left-aligned three-column table with a header row.
fn render_table(columns: &FeatureColumns) -> String {
    const HEADERS: [&str; 3] = ["FEATURE", "TYPE", "DESCRIPTION"];

    let name_width = column_width(&columns.features, HEADERS[0]);
    let type_width = column_width(&columns.feature_types, HEADERS[1]);

    let mut out = String::new();
    let mut row = |name: &str, kind: &str, description: &str| {
        let line = format!("{name:<name_width$}  {kind:<type_width$}  {description}");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    row(HEADERS[0], HEADERS[1], HEADERS[2]);
    for ((name, kind), description) in columns
        .features
        .iter()
        .zip(&columns.feature_types)
        .zip(&columns.feature_descriptions)
    {
        row(name, kind, description);
    }
    out
}

fn column_width(values: &[String], header: &str) -> usize {
    values
        .iter()
        .map(|v| v.chars().count())
        .fold(header.len(), usize::max)
}
