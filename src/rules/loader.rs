//! JSON-based rule loader
//!
//! Swapping the rules file models a different regulatory snapshot without code changes.

use super::RuleParameters;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default path to the regulation snapshot shipped with the crate
pub const DEFAULT_RULES_PATH: &str = "data/regulation_2025.json";

/// Load and validate rule parameters from a JSON file
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<RuleParameters> {
    let path = path.as_ref();
    log::debug!("Loading rule parameters from {}", path.display());
    let file = File::open(path)?;
    load_rules_from_reader(BufReader::new(file))
}

/// Load and validate rule parameters from any reader
pub fn load_rules_from_reader<R: Read>(reader: R) -> Result<RuleParameters> {
    let rules: RuleParameters = serde_json::from_reader(reader)?;
    rules.validate()?;
    Ok(rules)
}
