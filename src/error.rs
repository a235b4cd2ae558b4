use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source] source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source] source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source] source: std::io::Error,
    },
    #[error("no match data available from the feed or its cached copy")]
    NoData,
    #[error(transparent)] Csv(#[from] csv::Error),
    #[error(transparent)] Encode(#[from] serde_json::Error),
}
