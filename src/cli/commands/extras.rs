//! `envtree extras <name>`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::SettingsRegistry;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::services::masking::{is_sensitive, mask};

#[derive(Debug, Serialize)]
pub struct ExtrasOutput {
    pub name: String,
    pub extras: BTreeMap<String, String>,
}

impl ExtrasOutput {
    /// Masks sensitive keys the same way `show` does.
    pub fn new(name: &str, extras: &BTreeMap<String, String>) -> Self {
        let extras = extras
            .iter()
            .map(|(key, raw)| {
                let shown = if is_sensitive(key) { mask(raw) } else { raw.clone() };
                (key.clone(), shown)
            })
            .collect();
        Self {
            name: name.to_string(),
            extras,
        }
    }
}

impl CommandOutput for ExtrasOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["key", "value"]);
        for (key, value) in &self.extras {
            table.add_row(vec![key.clone(), value.clone()]);
        }
        render_list("extra field", &table, self.extras.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(registry: &SettingsRegistry, name: &str, json_mode: bool) -> Result<()> {
    let config = registry
        .get(name)
        .with_context(|| format!("Failed to resolve config `{name}`"))?;
    output(&ExtrasOutput::new(name, config.extra_fields()), json_mode);
    Ok(())
}
