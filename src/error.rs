use thiserror::Error;

pub type Result<T, E = CloneError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum CloneError {
    #[error(
        "No GitHub token could be found. Create ~/.github-token containing it, \
         or set it in the GITHUB_TOKEN environment variable."
    )]
    MissingCredential,

    #[error("GitHub authentication failed: {0}")]
    Auth(String),

    #[error("Error opening repository {repo}: {reason}")]
    RepoNotFound { repo: String, reason: String },

    #[error("label '{0}' already exists")]
    DuplicateLabel(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("GitHub API error: {0}")]
    Remote(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl CloneError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateLabel(_))
    }
}

/// HTTP status carried by a GitHub error response, if any.
pub fn status_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

impl From<octocrab::Error> for CloneError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                Self::Remote(format!("{} {}", source.status_code, source.message))
            }
            other => Self::Remote(other.to_string()),
        }
    }
}
