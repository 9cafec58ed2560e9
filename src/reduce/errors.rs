use thiserror::Error;

/// Which numeric key failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercedField {
    Rating,
    Price,
    ReviewCount,
}

impl std::fmt::Display for CoercedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Rating => "rating",
            Self::Price => "price",
            Self::ReviewCount => "review count",
        })
    }
}

/// A surviving record whose text does not parse as the expected number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field} {raw:?} of {description:?} is not numeric")]
pub struct CoercionError {
    pub field: CoercedField,
    pub raw: String,
    pub description: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReduceError {
    #[error("coercion failed: {0}")]
    Coercion(#[from] CoercionError),

    #[error("quantile {0} is outside [0, 1]")]
    InvalidQuantile(f64),
}
