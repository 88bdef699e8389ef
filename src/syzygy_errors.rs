use hifitime::Epoch;
use thiserror::Error;

/// Failure reported by an [`EphemerisProvider`](crate::ephemeris::EphemerisProvider).
///
/// The search engine never retries nor skips on these: they are wrapped verbatim into
/// [`SyzygyError::Ephemeris`] and abort the whole search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Unknown body identifier: {0}")]
    UnknownBody(String),

    #[error("Body {body} is not supported by the {provider} provider")]
    UnsupportedBody { body: String, provider: &'static str },

    #[error("Epoch {epoch} is outside the ephemeris coverage for {body}")]
    OutOfCoverage { body: String, epoch: Epoch },

    #[error("Invalid ephemeris table: {0}")]
    InvalidTable(String),

    #[error("Ephemeris table for {0} has no rows")]
    EmptyTable(String),
}

#[derive(Error, Debug)]
pub enum SyzygyError {
    #[error("Invalid time range: end ({end}) must be strictly after start ({start})")]
    InvalidRange { start: Epoch, end: Epoch },

    #[error("Invalid sample count: {0} (at least 2 distinct instants are required)")]
    InvalidSampleCount(usize),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),

    #[error("Invalid observer: {0}")]
    InvalidObserver(String),

    #[error("Invalid search parameter: {0}")]
    InvalidSearchParameter(String),

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),

    #[error("NaN value encountered: {0}")]
    NanValue(#[from] ordered_float::FloatIsNan),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for SyzygyError {
    fn eq(&self, other: &Self) -> bool {
        use SyzygyError::*;
        match (self, other) {
            (
                InvalidRange {
                    start: s1,
                    end: e1,
                },
                InvalidRange {
                    start: s2,
                    end: e2,
                },
            ) => s1 == s2 && e1 == e2,
            (InvalidSampleCount(a), InvalidSampleCount(b)) => a == b,
            (InvalidTolerance(a), InvalidTolerance(b)) => a == b,
            (InvalidObserver(a), InvalidObserver(b)) => a == b,
            (InvalidSearchParameter(a), InvalidSearchParameter(b)) => a == b,
            (Ephemeris(a), Ephemeris(b)) => a == b,

            // not comparable: same variant is enough
            (NanValue(_), NanValue(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
