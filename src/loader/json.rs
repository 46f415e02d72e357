use std::{
    convert::TryInto,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{core::loader::InputParams, population::Population};

/// Loads a population from a JSON file.
///
/// `parameters` and `derived` may also be given as the path of another JSON
/// file holding the array, relative to this file.
pub fn load_population<P: AsRef<Path>>(path: P) -> anyhow::Result<Population> {
    let path = path.as_ref().to_path_buf();
    let mut json_value = read_json(&path, "population")?;

    for key in ["parameters", "derived"] {
        if let Some(value) = json_value.get_mut(key) {
            let env = format!("json-{}", key);
            *value = load_value_or_external(&path, value.take(), &env)?;
        }
    }

    let mut params: InputParams = json_value.try_into()?;
    params.set_name("population".into());
    params.set_base_path(path);
    Population::load(&mut params)
}

fn read_json(path: &Path, env: &str) -> anyhow::Result<serde_json::Value> {
    let json_file = std::fs::File::open(path)
        .with_context(|| format!("{} - can't open '{}'", env, path.display()))?;
    let json_reader = std::io::BufReader::new(json_file);
    let json_value = serde_json::from_reader(json_reader)
        .with_context(|| format!("{} - '{}' is not valid json", env, path.display()))?;
    Ok(json_value)
}

fn load_value_or_external(
    path: &Path,
    value: serde_json::Value,
    env: &str,
) -> anyhow::Result<serde_json::Value> {
    if let Some(json_path) = value.as_str() {
        let external = path.with_file_name(json_path);
        let json_value = read_json(&external, env)?;
        load_value_or_external(&external, json_value, env)
    } else if value.is_array() {
        Ok(value)
    } else {
        anyhow::bail!(format!("{} - field should be an array or a file path", env))
    }
}
