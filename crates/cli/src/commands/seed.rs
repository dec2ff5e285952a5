//! Seed selection options from YAML.
//!
//! The file maps each option type to its values in display order:
//!
//! ```yaml
//! category:
//!   - Food
//!   - Stationery
//! unit:
//!   - pcs
//!   - box
//! ```
//!
//! Seeding is idempotent: existing values are re-activated and re-ordered.
//! With `--clear`, options of the seeded types that are not in the file end
//! up deactivated.

use std::collections::BTreeMap;
use std::path::Path;

use factory_inventory_api::db::SelectionOptionRepository;
use factory_inventory_core::OptionType;
use tracing::info;

use super::{CommandError, connect};

/// Built-in option set used when no file is given.
const DEFAULT_OPTIONS: &str = include_str!("../../data/selection_options.yaml");

/// Values per option type, in display order.
pub type OptionsConfig = BTreeMap<OptionType, Vec<String>>;

/// Seed selection options from `file`, or the built-in defaults.
pub async fn selection_options(file: Option<&Path>, clear: bool) -> Result<(), CommandError> {
    let content = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading selection options from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CommandError::Io {
                    path: path.display().to_string(),
                    source,
                })?
        }
        None => DEFAULT_OPTIONS.to_owned(),
    };

    let config = parse_config(&content)?;
    info!(types = config.len(), "Parsed configuration");

    let pool = connect().await?;
    let options = SelectionOptionRepository::new(&pool);

    for (option_type, values) in &config {
        if clear {
            let cleared = options.deactivate_all(*option_type).await?;
            info!(%option_type, cleared, "Deactivated existing options");
        }
        for (sort_order, value) in values.iter().enumerate() {
            let sort_order = i32::try_from(sort_order)
                .map_err(|_| CommandError::Invalid(format!("too many {option_type} values")))?;
            options.upsert(*option_type, value, sort_order).await?;
        }
        info!(%option_type, seeded = values.len(), "Seeded options");
    }

    info!("Seeding complete!");
    Ok(())
}

/// Parse and validate a seed file.
///
/// Blank and duplicate values within a type are rejected.
pub fn parse_config(content: &str) -> Result<OptionsConfig, CommandError> {
    let config: OptionsConfig = serde_yaml::from_str(content)?;

    for (option_type, values) in &config {
        let mut seen = std::collections::HashSet::new();
        for value in values {
            let value = value.trim();
            if value.is_empty() {
                return Err(CommandError::Invalid(format!("blank {option_type} value")));
            }
            if !seen.insert(value) {
                return Err(CommandError::Invalid(format!(
                    "duplicate {option_type} value: {value}"
                )));
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_parse() {
        let config = parse_config(DEFAULT_OPTIONS).unwrap();
        assert_eq!(config.len(), 3);
        assert_eq!(config.get(&OptionType::Category).unwrap()[0], "Food");
        assert_eq!(config.get(&OptionType::Unit).unwrap().len(), 11);
    }

    #[test]
    fn test_partial_file() {
        let config = parse_config("supplier:\n  - Acme\n").unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config.get(&OptionType::Supplier).unwrap(), &vec!["Acme".to_string()]);
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert!(matches!(
            parse_config("colour:\n  - red\n"),
            Err(CommandError::Yaml(_))
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_blanks() {
        assert!(parse_config("unit:\n  - kg\n  - ' kg'\n").is_err());
        assert!(parse_config("unit:\n  - ''\n").is_err());
    }
}
