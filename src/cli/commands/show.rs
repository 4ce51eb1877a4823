//! `envtree show <name>`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::application::SettingsRegistry;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::services::masking::{to_printable, to_printable_flat};

const MAX_VALUE_WIDTH: usize = 60;

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub name: String,
    pub prefix: String,
    pub config: Map<String, Json>,
    #[serde(skip)]
    pub flat: BTreeMap<String, Json>,
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["field", "value"]);
        for (path, value) in &self.flat {
            let shown = match value {
                Json::String(s) => s.clone(),
                other => other.to_string(),
            };
            table.add_row(vec![path.clone(), truncate(&shown, MAX_VALUE_WIDTH)]);
        }
        format!(
            "Config `{}` (prefix {:?})\n{}",
            self.name,
            self.prefix,
            render_list("field", &table, self.flat.len())
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(registry: &SettingsRegistry, name: &str, json_mode: bool) -> Result<()> {
    let config = registry
        .get(name)
        .with_context(|| format!("Failed to resolve config `{name}`"))?;

    let out = ShowOutput {
        name: name.to_string(),
        prefix: registry.prefix(name).unwrap_or_default().to_string(),
        config: to_printable(config),
        flat: to_printable_flat(config),
    };
    output(&out, json_mode);
    Ok(())
}
