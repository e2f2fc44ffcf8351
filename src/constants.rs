/// Names shared between the CLI, the HTTP adapters and the snapshot side channel

// Environment variables holding the registry tokens
pub const SOURCE_TOKEN_VAR: &str = "SOURCE_REGISTRY_TOKEN";
pub const DESTINATION_TOKEN_VAR: &str = "DESTINATION_REGISTRY_TOKEN";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// Discriminant key on source defined variables
pub const VARIABLE_TYPE_KEY: &str = "definedVariableType";

// Multipart upload of code list entries
pub const ENTRY_IMPORT_PART_NAME: &str = "file";
pub const ENTRY_IMPORT_FILE_NAME: &str = "codelist-entries.json";
pub const JSON_MIME: &str = "application/json";

// Snapshot names written by the migration run
pub const SNAPSHOT_VARIABLE: &str = "defined_variable";
pub const SNAPSHOT_CODE_LIST: &str = "code_list";
pub const SNAPSHOT_CODE_LIST_ENTRIES: &str = "code_list_entries";
pub const SNAPSHOT_CONCEPT: &str = "concept";
pub const SNAPSHOT_ENTRY_LIST: &str = "codelist_entries_payload";

// Snapshot names written by the reconciliation run
pub const SNAPSHOT_SOURCE_EXPORT: &str = "source_export";
pub const SNAPSHOT_DESTINATION_EXPORT: &str = "destination_export";
pub const REPORT_ONLY_IN_DESTINATION: &str = "only_in_destination";
pub const REPORT_ONLY_IN_SOURCE: &str = "only_in_source";
pub const REPORT_VERSION_MISMATCHES: &str = "version_mismatches";
