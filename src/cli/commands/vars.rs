//! `envtree vars <name>`

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::{SettingsError, SettingsRegistry};
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::env::KeyResolver;

#[derive(Debug, Serialize)]
pub struct VarRow {
    pub key: String,
    pub path: String,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub required: bool,
    pub set: bool,
}

#[derive(Debug, Serialize)]
pub struct VarsOutput {
    pub name: String,
    pub vars: Vec<VarRow>,
}

impl CommandOutput for VarsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["variable", "field", "type", "required", "set"]);
        for var in &self.vars {
            table.add_row(vec![
                var.key.clone(),
                var.path.clone(),
                var.type_name.to_string(),
                if var.required { "yes" } else { "no" }.to_string(),
                if var.set { "yes" } else { "-" }.to_string(),
            ]);
        }
        render_list("variable", &table, self.vars.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(registry: &SettingsRegistry, name: &str, json_mode: bool) -> Result<()> {
    let out = collect(registry, name).with_context(|| format!("Failed to list variables of `{name}`"))?;
    output(&out, json_mode);
    Ok(())
}

fn collect(registry: &SettingsRegistry, name: &str) -> Result<VarsOutput, SettingsError> {
    let options = registry.options_for(name)?;
    let schema = registry
        .schema(name)
        .ok_or_else(|| SettingsError::UnknownConfig(name.to_string()))?;
    let keys = KeyResolver::new(&options.prefix, &options.separator);

    let vars = keys
        .env_var_names(schema, options.max_depth)
        .into_iter()
        .map(|var| VarRow {
            set: registry.snapshot().contains(&var.key),
            key: var.key,
            path: var.path,
            type_name: var.type_name,
            required: var.required,
        })
        .collect();

    Ok(VarsOutput {
        name: name.to_string(),
        vars,
    })
}
