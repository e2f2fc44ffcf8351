use crate::app::ports::DestinationRegistryPort;
use crate::domain::{DataEnvelope, Environment, PersonRecord, PersonReference};
use crate::error::{MigrationError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Upper-case the first character, lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Given name from `first.last@domain`: the local part up to the first dot.
pub fn extract_and_capitalize_first(email: &str) -> String {
    let Some((local, _)) = email.split_once('@') else {
        return String::new();
    };
    capitalize(local.split('.').next().unwrap_or_default())
}

/// Family name from `first.last@domain`: the text between the first dot and
/// the `@`. Empty when there is no dot before the `@`.
pub fn extract_between_dot_and_at(email: &str) -> String {
    match (email.find('.'), email.find('@')) {
        (Some(dot), Some(at)) if dot < at => capitalize(&email[dot + 1..at]),
        _ => String::new(),
    }
}

pub fn synthesize_person(reference: &PersonReference) -> PersonRecord {
    let email = reference.email();
    PersonRecord {
        given_name: extract_and_capitalize_first(email),
        family_name: extract_between_dot_and_at(email),
        email: email.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PersonResolution {
    Created,
    Existing,
}

/// Makes sure a referenced person exists in the destination directory
#[derive(Clone)]
pub struct PersonResolver {
    destination: Arc<dyn DestinationRegistryPort>,
}

impl PersonResolver {
    pub fn new(destination: Arc<dyn DestinationRegistryPort>) -> Self {
        Self { destination }
    }

    /// Look the person up and create it only when absent, so repeated runs
    /// never write twice for the same email.
    #[instrument(skip(self, reference), fields(email = %reference.email()))]
    pub async fn ensure_person(
        &self,
        reference: &PersonReference,
        env: Environment,
    ) -> Result<PersonResolution> {
        if self.destination.get_person(reference.email(), env).await?.is_some() {
            info!("Person already exists");
            return Ok(PersonResolution::Existing);
        }

        let payload = DataEnvelope::new(vec![synthesize_person(reference)]);
        let response = self.destination.create_person(&payload, env).await?;
        info!(status = response.status, body = %response.body, "Created person");
        if !response.is_success() {
            return Err(MigrationError::Rejected {
                operation: "create person",
                status: response.status,
                body: response.body,
            });
        }
        Ok(PersonResolution::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_extraction() {
        assert_eq!(extract_between_dot_and_at("jane.doe@x.ch"), "Doe");
        assert_eq!(extract_and_capitalize_first("jane.doe@x.ch"), "Jane");
    }

    #[test]
    fn test_no_dot_before_at_gives_empty_family_name() {
        assert_eq!(extract_between_dot_and_at("jdoe@x.ch"), "");
        assert_eq!(extract_and_capitalize_first("jdoe@x.ch"), "Jdoe");
    }

    #[test]
    fn test_missing_at_gives_empty_names() {
        assert_eq!(extract_between_dot_and_at("jane.doe"), "");
        assert_eq!(extract_and_capitalize_first("jane.doe"), "");
    }

    #[test]
    fn test_capitalization_lowers_the_rest() {
        assert_eq!(extract_between_dot_and_at("JANE.MUSTER@bfs.admin.ch"), "Muster");
        assert_eq!(extract_and_capitalize_first("JANE.MUSTER@bfs.admin.ch"), "Jane");
        assert_eq!(extract_and_capitalize_first("émile.zola@x.fr"), "Émile");
    }

    #[test]
    fn test_synthesize_person() {
        let person = synthesize_person(&PersonReference::new("max.muster@example.ch"));
        assert_eq!(
            person,
            PersonRecord {
                given_name: "Max".to_string(),
                family_name: "Muster".to_string(),
                email: "max.muster@example.ch".to_string(),
            }
        );
        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["givenName"], "Max");
        assert_eq!(value["familyName"], "Muster");
    }
}
