//! Seed the reference workbooks.
//!
//! The exercise catalog YAML groups exercises by body position:
//!
//! ```yaml
//! - position: De pie
//!   exercises: [Sentadilla, Zancada]
//! - position: Tumbado
//!   exercises: [Puente]
//! ```

use std::path::Path;

use serde::Deserialize;
use techealth_core::ExerciseEntry;
use techealth_sheets::{RecordStore, RecordTable, Table, files, workbook::write_xlsx};
use tracing::info;

use super::{CommandError, blocking};

/// Header row of the HR Analytics template.
pub const HR_TEMPLATE_COLUMNS: [&str; 6] = [
    "Employee",
    "Department",
    "Hire Date",
    "Satisfaction",
    "Monthly Salary",
    "Left Company",
];

/// One group of the catalog YAML.
#[derive(Debug, Deserialize)]
pub struct CatalogGroup {
    pub position: String,
    #[serde(default)]
    pub exercises: Vec<String>,
}

/// Flatten the YAML groups into catalog rows, skipping blank names.
///
/// # Errors
///
/// Returns `CommandError::Yaml` for malformed YAML and
/// `CommandError::EmptyCatalog` if no row remains.
pub fn parse_catalog(yaml: &str) -> Result<Vec<ExerciseEntry>, CommandError> {
    let groups: Vec<CatalogGroup> = serde_yaml::from_str(yaml)?;

    let entries: Vec<ExerciseEntry> = groups
        .into_iter()
        .filter(|group| !group.position.trim().is_empty())
        .flat_map(|group| {
            let position = group.position.trim().to_string();
            group
                .exercises
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .map(move |exercise_name| ExerciseEntry {
                    body_position: position.clone(),
                    exercise_name,
                })
        })
        .collect();

    if entries.is_empty() {
        return Err(CommandError::EmptyCatalog);
    }
    Ok(entries)
}

/// Write `ejercicios_pacientes.xlsx` from the YAML catalog at `yaml_path`.
///
/// # Errors
///
/// Returns `CommandError` if the YAML cannot be read or parsed, the catalog
/// exists without `force`, or the workbook cannot be written.
pub async fn exercises(data_dir: &Path, yaml_path: &Path, force: bool) -> Result<(), CommandError> {
    info!(path = %yaml_path.display(), "Loading exercise catalog");
    let content = tokio::fs::read_to_string(yaml_path)
        .await
        .map_err(|source| CommandError::Read {
            path: yaml_path.to_path_buf(),
            source,
        })?;
    let entries = parse_catalog(&content)?;
    info!(exercises = entries.len(), "Parsed catalog");

    let target = data_dir.join(files::EXERCISES);
    if target.exists() && !force {
        return Err(CommandError::AlreadyExists(target));
    }

    blocking(move || {
        RecordStore::<ExerciseEntry>::new(target).persist(&RecordTable::from_records(entries))?;
        Ok(())
    })
    .await?;

    info!("Exercise catalog written");
    Ok(())
}

/// Write an empty HR Analytics template with its header row.
///
/// # Errors
///
/// Returns `CommandError` if the template exists without `force` or the
/// workbook cannot be written.
pub async fn template(data_dir: &Path, force: bool) -> Result<(), CommandError> {
    let target = data_dir.join(files::HR_TEMPLATE);
    if target.exists() && !force {
        return Err(CommandError::AlreadyExists(target));
    }

    blocking(move || {
        write_xlsx(&Table::new(HR_TEMPLATE_COLUMNS), &target)?;
        info!(path = %target.display(), "HR template written");
        Ok(())
    })
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use techealth_sheets::workbook::read_xlsx;

    use super::*;

    const CATALOG: &str = "
- position: De pie
  exercises: [Sentadilla, '  ', Zancada]
- position: Tumbado
  exercises: [Puente]
- position: ''
  exercises: [Plancha]
";

    #[test]
    fn test_parse_catalog_flattens_groups() {
        let entries = parse_catalog(CATALOG).unwrap();
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.body_position.as_str(), e.exercise_name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("De pie", "Sentadilla"),
                ("De pie", "Zancada"),
                ("Tumbado", "Puente"),
            ]
        );
    }

    #[test]
    fn test_parse_catalog_rejects_empty() {
        assert!(matches!(
            parse_catalog("- position: De pie\n").unwrap_err(),
            CommandError::EmptyCatalog
        ));
        assert!(matches!(
            parse_catalog("position: [").unwrap_err(),
            CommandError::Yaml(_)
        ));
    }

    #[tokio::test]
    async fn test_seed_exercises_writes_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("catalog.yaml");
        std::fs::write(&yaml, CATALOG).unwrap();

        exercises(dir.path(), &yaml, false).await.unwrap();
        let loaded = RecordStore::<ExerciseEntry>::new(dir.path().join(files::EXERCISES))
            .load_or_create()
            .unwrap();
        assert_eq!(loaded.value.len(), 3);

        let err = exercises(dir.path(), &yaml, false).await.unwrap_err();
        assert!(matches!(err, CommandError::AlreadyExists(_)));
        exercises(dir.path(), &yaml, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_seed_template_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        template(dir.path(), false).await.unwrap();

        let table = read_xlsx(&dir.path().join(files::HR_TEMPLATE)).unwrap();
        assert_eq!(table.columns(), HR_TEMPLATE_COLUMNS);
        assert!(table.is_empty());
    }
}
