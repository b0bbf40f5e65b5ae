use clap::Parser;

/// Copy labelled issues (and optionally milestones) from one GitHub repository to another.
///
/// Every option can also be set through the environment, e.g. TASKCLONE_SOURCE__OWNER
/// or TASKCLONE_LABEL. Flags take precedence.
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// The source repo owner name (owner may be an org or user) [required]
    #[arg(long)]
    pub source_owner: Option<String>,

    /// The source repo name [required]
    #[arg(long)]
    pub source_repo: Option<String>,

    /// The target repo owner name (owner may be an org or user) [required]
    #[arg(long)]
    pub target_owner: Option<String>,

    /// The target repo name [required]
    #[arg(long)]
    pub target_repo: Option<String>,

    /// A label to limit copying to [default: annual]
    #[arg(long)]
    pub label: Option<String>,

    /// Copy milestones to the target repo, matching existing ones by title
    #[arg(long)]
    pub clone_milestones: bool,

    /// Comma-separated labels to copy besides the selection label [default: copy all labels]
    #[arg(long)]
    pub whitelist: Option<String>,
}
