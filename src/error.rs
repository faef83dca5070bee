//! Error types for wildreid.

/// Result type alias for wildreid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for wildreid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to read a metadata file.
    #[error("failed to read metadata file '{path}'")]
    MetadataRead {
        /// Path to the metadata file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Metadata content is invalid.
    #[error("invalid metadata in '{path}': {message}")]
    InvalidMetadata {
        /// Path to the metadata file.
        path: std::path::PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// Two records share the same image identifier.
    #[error("duplicate image_id '{image_id}' in '{path}'")]
    DuplicateImageId {
        /// Path to the offending file.
        path: std::path::PathBuf,
        /// The repeated identifier.
        image_id: String,
    },

    /// Failed to read an embedding table.
    #[error("failed to read embeddings file '{path}'")]
    EmbeddingRead {
        /// Path to the embeddings file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Embedding table content is invalid.
    #[error("invalid embeddings in '{path}': {message}")]
    InvalidEmbeddings {
        /// Path to the embeddings file.
        path: std::path::PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// No embedding is available for a requested image.
    #[error("no embedding for image '{image_id}'")]
    EmbeddingMissing {
        /// Image identifier without an embedding.
        image_id: String,
    },

    /// Gallery and query embeddings have different dimensions.
    #[error("embedding dimension mismatch: gallery has {gallery}, queries have {query}")]
    DimensionMismatch {
        /// Gallery embedding dimension.
        gallery: usize,
        /// Query embedding dimension.
        query: usize,
    },

    /// Embedding rows and records disagree in count.
    #[error("{records} records but {rows} embedding rows")]
    RowCountMismatch {
        /// Number of records.
        records: usize,
        /// Number of embedding rows.
        rows: usize,
    },

    /// Failed to read a local score table.
    #[error("failed to read local scores file '{path}'")]
    LocalScoresRead {
        /// Path to the local scores file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Local score table content is invalid.
    #[error("invalid local scores in '{path}': {message}")]
    InvalidLocalScores {
        /// Path to the local scores file.
        path: std::path::PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// The local matcher returned scores that do not line up with the shortlist.
    #[error(
        "local matcher returned {actual} for query '{query_id}', expected {expected} scores"
    )]
    LocalScoreShape {
        /// Query image identifier.
        query_id: String,
        /// Shortlist size.
        expected: usize,
        /// Description of the returned shape.
        actual: String,
    },

    /// Failed to build the re-scoring thread pool.
    #[error("failed to build thread pool")]
    ThreadPool {
        /// Underlying rayon error.
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    /// Failed to write the submission file.
    #[error("failed to write submission file '{path}'")]
    SubmissionWrite {
        /// Path to the submission file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
