use crate::app::ports::{ApiResponse, DestinationRegistryPort, SnapshotPort, SourceRegistryPort};
use crate::constants::{
    SNAPSHOT_CODE_LIST, SNAPSHOT_CODE_LIST_ENTRIES, SNAPSHOT_CONCEPT, SNAPSHOT_ENTRY_LIST,
    SNAPSHOT_VARIABLE,
};
use crate::domain::{Environment, PersonReference, SourceCodeList, SourceVariable};
use crate::error::{MigrationError, Result};
use crate::pipeline::{PersonResolution, PersonResolver, SchemaTransformer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Milestones of a single-record migration, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MigrationState {
    Fetched,
    Transformed,
    PersonsResolved,
    Posted,
    StatusAdvanced,
    Published,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the destination answered for one write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: &'static str,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonOutcome {
    pub email: String,
    pub resolution: PersonResolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    pub variable_identifier: String,
    pub concept_type: &'static str,
    pub concept_id: String,
    pub persons: Vec<PersonOutcome>,
    /// Number of code list entries uploaded, for code list variables
    pub entries_imported: Option<usize>,
    pub steps: Vec<StepReport>,
    pub state: MigrationState,
}

/// A migration that stopped early; `reached` is the last state completed
#[derive(Debug, thiserror::Error)]
#[error(
    "migration failed after {}: {error}",
    .reached.map(|s| s.to_string()).unwrap_or_else(|| "no completed state".to_string())
)]
pub struct MigrationFailure {
    pub reached: Option<MigrationState>,
    pub steps: Vec<StepReport>,
    #[source]
    pub error: MigrationError,
}

#[derive(Default)]
struct Progress {
    reached: Option<MigrationState>,
    steps: Vec<StepReport>,
    persons: Vec<PersonOutcome>,
    entries_imported: Option<usize>,
}

impl Progress {
    fn advance(&mut self, state: MigrationState) {
        info!(state = %state, "Migration advanced");
        self.reached = Some(state);
    }

    /// Record a destination answer and fail the step on a non-success status
    fn check(&mut self, step: &'static str, response: ApiResponse) -> Result<String> {
        info!(step, status = response.status, body = %response.body, "Destination responded");
        self.steps.push(StepReport {
            step,
            status: response.status,
            body: response.body.clone(),
        });
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(MigrationError::Rejected {
                operation: step,
                status: response.status,
                body: response.body,
            })
        }
    }
}

/// The concept id is the response body with its JSON string quotes removed
fn parse_concept_id(body: &str) -> Result<String> {
    let id = body.trim().trim_matches('"');
    if id.is_empty() {
        return Err(MigrationError::MissingField(
            "concept identifier in create response".to_string(),
        ));
    }
    Ok(id.to_string())
}

/// Moves one defined variable from the source registry into a destination
/// environment.
pub struct MigrateUseCase {
    source: Arc<dyn SourceRegistryPort>,
    destination: Arc<dyn DestinationRegistryPort>,
    snapshots: Arc<dyn SnapshotPort>,
    transformer: SchemaTransformer,
    persons: PersonResolver,
}

impl MigrateUseCase {
    pub fn new(
        source: Arc<dyn SourceRegistryPort>,
        destination: Arc<dyn DestinationRegistryPort>,
        snapshots: Arc<dyn SnapshotPort>,
        transformer: SchemaTransformer,
    ) -> Self {
        let persons = PersonResolver::new(destination.clone());
        Self {
            source,
            destination,
            snapshots,
            transformer,
            persons,
        }
    }

    /// Run every step in order and stop at the first failure.
    #[instrument(skip(self))]
    pub async fn migrate(
        &self,
        variable_id: &str,
        env: Environment,
    ) -> std::result::Result<MigrationOutcome, MigrationFailure> {
        let mut progress = Progress::default();
        match self.run(variable_id, env, &mut progress).await {
            Ok((variable, concept_id)) => Ok(MigrationOutcome {
                variable_identifier: variable.identifier().to_string(),
                concept_type: variable.kind.name(),
                concept_id,
                persons: progress.persons,
                entries_imported: progress.entries_imported,
                steps: progress.steps,
                state: MigrationState::Published,
            }),
            Err(error) => {
                error!(reached = ?progress.reached, "Migration failed: {}", error);
                Err(MigrationFailure {
                    reached: progress.reached,
                    steps: progress.steps,
                    error,
                })
            }
        }
    }

    async fn run(
        &self,
        variable_id: &str,
        env: Environment,
        progress: &mut Progress,
    ) -> Result<(SourceVariable, String)> {
        let (variable, code_list) = self.fetch(variable_id).await?;
        progress.advance(MigrationState::Fetched);

        // Nothing has been written yet; a transform error ends the run here
        let transformed = self.transformer.transform(&variable, code_list.as_ref())?;
        self.snapshot(SNAPSHOT_CONCEPT, &transformed.concept).await;
        if let Some(entry_list) = &transformed.entry_list {
            self.snapshot(SNAPSHOT_ENTRY_LIST, entry_list).await;
        }
        progress.advance(MigrationState::Transformed);

        progress.persons = self.resolve_persons(&variable, env).await?;
        progress.advance(MigrationState::PersonsResolved);

        let response = self.destination.create_concept(&transformed.concept, env).await?;
        let concept_id = parse_concept_id(&progress.check("create concept", response)?)?;
        info!(identifier = %variable.identifier(), concept_id = %concept_id, "Migrated defined variable");
        progress.advance(MigrationState::Posted);

        if let Some(entry_list) = &transformed.entry_list {
            let response = self
                .destination
                .import_code_list_entries(&concept_id, entry_list, env)
                .await?;
            progress.check("import code list entries", response)?;
            progress.entries_imported = Some(entry_list.data.len());
            info!(entries = entry_list.data.len(), "Imported code list entries");
        }

        let response = self.destination.set_registration_status(&concept_id, env).await?;
        progress.check("set registration status", response)?;
        progress.advance(MigrationState::StatusAdvanced);

        let response = self.destination.set_publication_level(&concept_id, env).await?;
        progress.check("set publication level", response)?;
        progress.advance(MigrationState::Published);

        Ok((variable, concept_id))
    }

    async fn fetch(&self, variable_id: &str) -> Result<(SourceVariable, Option<SourceCodeList>)> {
        let raw = self
            .source
            .get_variable(variable_id)
            .await?
            .ok_or_else(|| MigrationError::NotFound {
                kind: "defined variable",
                id: variable_id.to_string(),
            })?;
        self.snapshots.record(SNAPSHOT_VARIABLE, &raw).await;
        let variable = SourceVariable::from_value(&raw)?;

        let Some(code_list_id) = variable.code_list_id() else {
            return Ok((variable, None));
        };

        let header = self.source.get_code_list(code_list_id).await?;
        let entries = self.source.get_code_list_entries(code_list_id).await?;
        let code_list = match (header, entries) {
            (Some(header), Some(entries)) => {
                self.snapshots.record(SNAPSHOT_CODE_LIST, &header).await;
                self.snapshots
                    .record(SNAPSHOT_CODE_LIST_ENTRIES, &Value::Array(entries.clone()))
                    .await;
                Some(SourceCodeList::from_parts(&header, entries)?)
            }
            // Left to the transformer to reject
            _ => {
                warn!(code_list_id, "Code list or its entries not available");
                None
            }
        };
        Ok((variable, code_list))
    }

    /// Resolve responsible person and deputy concurrently. Both are attempted
    /// even if one fails; the migration only continues when both succeed.
    async fn resolve_persons(
        &self,
        variable: &SourceVariable,
        env: Environment,
    ) -> Result<Vec<PersonOutcome>> {
        let mut references: Vec<&PersonReference> = Vec::with_capacity(2);
        for reference in variable.persons() {
            if !references.iter().any(|r| r.email() == reference.email()) {
                references.push(reference);
            }
        }

        let results = resolve_all(&self.persons, &references, env).await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut first_error = None;
        for (reference, result) in references.iter().zip(results) {
            match result {
                Ok(resolution) => outcomes.push(PersonOutcome {
                    email: reference.email().to_string(),
                    resolution,
                }),
                Err(e) => {
                    warn!(email = %reference.email(), "Person resolution failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    async fn snapshot<T: Serialize>(&self, name: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.snapshots.record(name, &value).await,
            Err(e) => warn!(name, "Could not serialize snapshot: {}", e),
        }
    }
}

async fn resolve_all(
    resolver: &PersonResolver,
    references: &[&PersonReference],
    env: Environment,
) -> Vec<Result<PersonResolution>> {
    match references {
        [only] => vec![resolver.ensure_person(only, env).await],
        [first, second] => {
            let (a, b) = tokio::join!(
                resolver.ensure_person(first, env),
                resolver.ensure_person(second, env)
            );
            vec![a, b]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_concept_id_strips_quotes() {
        assert_eq!(parse_concept_id("\"08dd-abc\"").unwrap(), "08dd-abc");
        assert_eq!(parse_concept_id("  \"08dd-abc\"\n").unwrap(), "08dd-abc");
        assert_eq!(parse_concept_id("08dd-abc").unwrap(), "08dd-abc");
    }

    #[test]
    fn test_parse_concept_id_rejects_empty_body() {
        assert!(matches!(
            parse_concept_id("\"\""),
            Err(MigrationError::MissingField(_))
        ));
    }

    #[test]
    fn test_states_are_ordered() {
        assert!(MigrationState::Fetched < MigrationState::Transformed);
        assert!(MigrationState::Posted < MigrationState::StatusAdvanced);
        assert!(MigrationState::StatusAdvanced < MigrationState::Published);
        assert_eq!(MigrationState::PersonsResolved.to_string(), "PersonsResolved");
    }

    #[test]
    fn test_failure_message_names_reached_state() {
        let failure = MigrationFailure {
            reached: Some(MigrationState::Posted),
            steps: Vec::new(),
            error: MigrationError::Config("x".to_string()),
        };
        assert!(failure.to_string().contains("after Posted"));

        let failure = MigrationFailure {
            reached: None,
            steps: Vec::new(),
            error: MigrationError::Config("x".to_string()),
        };
        assert!(failure.to_string().contains("no completed state"));
    }
}
