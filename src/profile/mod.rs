use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LedgerError;

/// The four logical fields of a normalised transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Amount,
    Date,
    Category,
    Description,
}

/// Maps the columns of one CSV source onto the four logical transaction
/// fields. Column names are matched case-insensitively against the file
/// header. Every record in a `TransactionSet` was normalised under the
/// set's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Profile {
    name: String,
    amount_column: String,
    date_column: String,
    category_column: String,
    description_column: String,
    ignore_negatives: bool,
}

impl Profile {
    pub(crate) fn new(
        name: &str,
        amount_column: &str,
        date_column: &str,
        category_column: &str,
        description_column: &str,
        ignore_negatives: bool,
    ) -> Result<Profile, LedgerError> {
        let columns = [
            ("amount", amount_column),
            ("date", date_column),
            ("category", category_column),
            ("description", description_column),
        ];
        for (field, column) in columns {
            if column.trim().is_empty() {
                return Err(LedgerError::InvalidProfileError(format!(
                    "profile '{name}': empty column name for '{field}'"
                )));
            }
        }

        Ok(Profile {
            name: name.to_string(),
            amount_column: amount_column.to_string(),
            date_column: date_column.to_string(),
            category_column: category_column.to_string(),
            description_column: description_column.to_string(),
            ignore_negatives,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn ignore_negatives(&self) -> bool {
        self.ignore_negatives
    }

    pub(crate) fn column(&self, field: Field) -> &str {
        match field {
            Field::Amount => &self.amount_column,
            Field::Date => &self.date_column,
            Field::Category => &self.category_column,
            Field::Description => &self.description_column,
        }
    }

    /// Resolve a logical field name, or one of this profile's raw column
    /// names, into a `Field`. Matching is case-insensitive.
    pub(crate) fn resolve_field(&self, name: &str) -> Result<Field, LedgerError> {
        let lower = name.to_lowercase();
        match lower.as_str() {
            "amount" => return Ok(Field::Amount),
            "date" => return Ok(Field::Date),
            "category" => return Ok(Field::Category),
            "description" => return Ok(Field::Description),
            _ => {}
        }

        for field in [Field::Amount, Field::Date, Field::Category, Field::Description] {
            if lower == self.column(field).to_lowercase() {
                return Ok(field);
            }
        }

        Err(LedgerError::UnknownFieldError(format!(
            "'{name}' is not a field of profile '{}'",
            self.name
        )))
    }
}

/// Named profile definitions, fixed for the lifetime of the process.
/// Built once in `main` and passed to whatever loads transactions.
#[derive(Debug, Clone)]
pub(crate) struct ProfileRegistry {
    profiles: HashMap<String, Profile>,
}

/// On-disk shape of a profiles file: a `[profiles.<name>]` table per entry.
#[derive(Deserialize, Debug)]
struct ProfileFile {
    profiles: HashMap<String, ProfileDef>,
}

#[derive(Deserialize, Debug)]
struct ProfileDef {
    amount: String,
    date: String,
    category: String,
    description: String,
    #[serde(default)]
    ignore_negatives: bool,
}

impl ProfileRegistry {
    /// Registry holding only the compiled-in profiles.
    pub(crate) fn builtin() -> ProfileRegistry {
        let amex = Profile {
            name: "amex".to_string(),
            amount_column: "amount".to_string(),
            date_column: "date".to_string(),
            category_column: "category".to_string(),
            description_column: "description".to_string(),
            ignore_negatives: true,
        };

        let mut profiles = HashMap::new();
        profiles.insert(amex.name.clone(), amex);
        ProfileRegistry { profiles }
    }

    /// Built-in profiles plus the entries of a TOML profiles file. A file
    /// entry with the same name as a built-in replaces it.
    pub(crate) fn load_from_file(file_path: &str) -> Result<ProfileRegistry, LedgerError> {
        let path = Path::new(file_path);
        if !path.is_file() {
            return Err(LedgerError::SourceNotFoundError(file_path.to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| LedgerError::SourceNotFoundError(format!("{file_path}: {e}")))?;
        let file: ProfileFile = toml::from_str(&content)
            .map_err(|e| LedgerError::InvalidProfileError(format!("{file_path}: {e}")))?;

        let mut registry = ProfileRegistry::builtin();
        for (name, def) in file.profiles {
            let profile = Profile::new(
                &name,
                &def.amount,
                &def.date,
                &def.category,
                &def.description,
                def.ignore_negatives,
            )?;
            registry.profiles.insert(name, profile);
        }
        Ok(registry)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}
