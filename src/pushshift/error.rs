use thiserror::Error;

/// Failure modes of a single search request.
///
/// The pipeline branches on these: connection failures skip one author,
/// everything else aborts the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced an HTTP response (DNS, connect, reset, body read).
    #[error("connection to search API failed: {0}")]
    Connection(String),

    /// One 429 response. Retried by `with_retry`.
    #[error("search API rate limited the request (HTTP 429)")]
    RateLimited,

    /// Still rate limited after every retry was spent.
    #[error("search API still rate limiting (HTTP 429) after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// Any status other than 200 or 429.
    #[error("received a {status} from the search API")]
    Status { status: u16 },

    /// 200 response whose body isn't a `{"data": [...]}` document.
    #[error("failed to decode search API response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_carries_code() {
        let err = FetchError::Status { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_exhausted_message_mentions_429_and_attempts() {
        let msg = FetchError::RetriesExhausted { attempts: 6 }.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains('6'));
    }

    #[test]
    fn test_classification() {
        assert!(FetchError::RateLimited.is_rate_limit());
        assert!(!FetchError::RetriesExhausted { attempts: 1 }.is_rate_limit());
        assert!(FetchError::Connection("reset".into()).is_connection());
        assert!(!FetchError::Status { status: 500 }.is_connection());
    }
}
