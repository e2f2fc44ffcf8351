use crate::error::MigrationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Destination deployment a migration targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    Dev,
    Ref,
    Abn,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Dev,
        Environment::Ref,
        Environment::Abn,
        Environment::Prod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Ref => "REF",
            Environment::Abn => "ABN",
            Environment::Prod => "PROD",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEV" => Ok(Environment::Dev),
            "REF" => Ok(Environment::Ref),
            "ABN" => Ok(Environment::Abn),
            "PROD" => Ok(Environment::Prod),
            _ => Err(MigrationError::InvalidEnvironment(s.to_string())),
        }
    }
}
