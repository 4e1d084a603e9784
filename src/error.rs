use thiserror::Error;

/// Failures raised while fetching or parsing listing pages.
///
/// Nothing here is retried. Each variant aborts the operation that raised it
/// and names the stage that failed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The server answered, but not with 200.
    #[error("fetch of {url} failed with status code {status}")]
    Status { url: String, status: u16 },

    /// The request never produced a response.
    #[error("fetch of {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The HTTP client could not be set up.
    #[error("could not build HTTP client: {0}")]
    Client(String),

    /// An expected node or attribute is missing from a fetched document.
    #[error("could not parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    /// A listing row lacks a required field or carries an unreadable one.
    #[error("malformed listing{}: {detail}", id.as_deref().map(|id| format!(" {id}")).unwrap_or_default())]
    MalformedRecord { id: Option<String>, detail: String },
}

impl ScrapeError {
    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        Self::Parse {
            what,
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed(id: Option<&str>, detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id: id.map(str::to_string),
            detail: detail.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_names_the_listing() {
        let err = ScrapeError::malformed(Some("7301"), "missing timestamp");
        assert_eq!(err.to_string(), "malformed listing 7301: missing timestamp");

        let err = ScrapeError::malformed(None, "missing data-pid");
        assert_eq!(err.to_string(), "malformed listing: missing data-pid");
    }

    #[test]
    fn client_setup_failure_does_not_read_as_a_fetch() {
        let err = ScrapeError::Client("invalid TLS backend".into());
        assert_eq!(err.to_string(), "could not build HTTP client: invalid TLS backend");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn status_is_exposed_only_for_http_failures() {
        let err = ScrapeError::Status {
            url: "https://sfbay.craigslist.org".into(),
            status: 403,
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(ScrapeError::parse("total count", "missing").status(), None);
    }
}
