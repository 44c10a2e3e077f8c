use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {}", .0.join("; "))]
    Config(Vec<String>),

    #[error("Corpus Error: {0}")]
    Corpus(String),

    /// A symbol needed by a retained bigram does not occur anywhere in the layout.
    #[error("Symbol '{symbol}' is counted by the bigram table but missing from the layout")]
    MissingSymbol { symbol: String },

    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Fixed/free partition differs between parents at cell {index}")]
    PartitionMismatch { index: usize },

    #[error("Parent is not a permutation of the free symbols (duplicate near cell {index})")]
    NotPermutation { index: usize },
}

impl GridError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        GridError::Config(vec![msg.into()])
    }
}

pub type GfResult<T> = Result<T, GridError>;
