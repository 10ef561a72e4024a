//! Loading of stat sheet overrides from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use turret_defence_core::StatsTable;

/// Built-in sheets, overridden per kind by the sheets found in `path`.
pub(crate) fn load(path: Option<&Path>) -> Result<StatsTable> {
    let mut table = StatsTable::standard();
    let Some(path) = path else {
        return Ok(table);
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read stats file {}", path.display()))?;
    let overrides = parse(&text)
        .with_context(|| format!("failed to parse stats file {}", path.display()))?;
    overlay(&mut table, overrides);
    Ok(table)
}

fn parse(text: &str) -> Result<StatsTable> {
    Ok(toml::from_str(text)?)
}

fn overlay(table: &mut StatsTable, overrides: StatsTable) {
    table.enemies.extend(overrides.enemies);
    table.turrets.extend(overrides.turrets);
    table.research.extend(overrides.research);
}
