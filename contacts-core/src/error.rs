use thiserror::Error;

/// Failure of a request before an application-level answer could be read.
///
/// A non-2xx response with a decodable JSON body is *not* a `FetchError`;
/// it is an [`ApiReply`](crate::api::ApiReply) with `ok == false`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// Raised only where a non-2xx status is treated as an error outright.
    #[error("{0}")]
    Status(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_keep_the_parser_message() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();

        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().contains("expected value"));
    }
}
