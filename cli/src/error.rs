/// The exit-code taxonomy spec §6 assigns to `generate`: usage, I/O, parse and codegen errors are
/// kept as distinct variants so `main` can translate the failing stage straight into a process
/// exit code rather than collapsing everything to a generic failure.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(String),

    #[error(transparent)]
    Codegen(#[from] xb_codegen::CodegenError),
}

impl From<xb_crawler::CrawlError> for CliError {
    fn from(err: xb_crawler::CrawlError) -> Self {
        CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 1,
            CliError::Io(_) => 2,
            CliError::Parse(_) => 3,
            CliError::Codegen(_) => 4,
        }
    }
}
