use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("no API token given (pass --token or set TODOIST_API_TOKEN)")]
    MissingToken,

    #[error("failed to fetch {resource}: {message}")]
    SourceFetch {
        resource: &'static str,
        message: String,
    },

    #[error("fetching {resource} returned HTTP {status}")]
    SourceStatus { resource: &'static str, status: u16 },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("malformed backup document: {0}")]
    MalformedBackup(String),

    #[error("malformed project template: {0}")]
    MalformedTemplate(String),

    #[error("project template '{0}' not found")]
    TemplateNotFound(String),

    #[error("{0} source reference(s) could not be resolved (rerun without --strict to skip them)")]
    UnresolvedReferences(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::SourceFetch { .. } => "source_fetch",
            Self::SourceStatus { .. } => "source_status",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::MalformedBackup(_) => "malformed_backup",
            Self::MalformedTemplate(_) => "malformed_template",
            Self::TemplateNotFound(_) => "template_not_found",
            Self::UnresolvedReferences(_) => "unresolved_references",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
