use std::fmt::{self, Display};
use std::io;

/// Stable identifiers for the errors the registry flow can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The version list could not be downloaded.
    UseDownload,
    /// The registry answered without any content.
    ServerUnavailable,
    /// The registry answered with a non-success status.
    ServerResponse,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UseDownload => "com.appcelerator.install.use.download.error",
            Self::ServerUnavailable => "com.appcelerator.install.download.server.unavailable",
            Self::ServerResponse => "com.appcelerator.install.download.server.response.error",
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            Self::UseDownload => "Error downloading the list of versions",
            Self::ServerUnavailable => {
                "The download server is unavailable. Please try again in a few minutes."
            }
            Self::ServerResponse => "The download server responded with an unexpected error",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized, named error carrying a stable code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
}

impl DomainError {
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let message = if detail.is_empty() {
            code.default_message().to_owned()
        } else {
            format!("{}: {detail}", code.default_message())
        };
        Self { code, message }
    }

    /// A domain error using the code's default message.
    pub fn bare(code: ErrorCode) -> Self {
        Self::new(code, "")
    }

    /// The stable code. `miette::Diagnostic::code` reports the same value as a string.
    pub fn error_code(&self) -> ErrorCode {
        self.code
    }
}

impl miette::Diagnostic for DomainError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.code.as_str()))
    }
}

/// The OS-level failure class of a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// The registry host name could not be resolved.
    HostNotFound,
    /// A local resource the request depends on does not exist.
    NotFound,
    ConnectionRefused,
    TimedOut,
}

impl TransportCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HostNotFound => "ENOTFOUND",
            Self::NotFound => "ENOENT",
            Self::ConnectionRefused => "ECONNREFUSED",
            Self::TimedOut => "ETIMEDOUT",
        }
    }

    /// Whether this failure means we are most likely offline.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::HostNotFound | Self::NotFound)
    }
}

impl Display for TransportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum FetchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),
    #[error("{message}")]
    Transport {
        code: Option<TransportCode>,
        message: String,
    },
}

impl FetchError {
    pub fn transport(code: Option<TransportCode>, message: impl Into<String>) -> Self {
        Self::Transport {
            code,
            message: message.into(),
        }
    }

    /// The transport code, if this is a classified transport failure.
    pub fn transport_code(&self) -> Option<TransportCode> {
        match self {
            Self::Transport { code, .. } => *code,
            Self::Domain(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            Some(TransportCode::TimedOut)
        } else {
            classify(&err)
        };
        Self::Transport {
            code,
            message: error_chain_message(&err),
        }
    }
}

/// Walks the source chain looking for a recognizable OS failure.
fn classify(err: &(dyn std::error::Error + 'static)) -> Option<TransportCode> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::NotFound => return Some(TransportCode::NotFound),
                io::ErrorKind::ConnectionRefused => return Some(TransportCode::ConnectionRefused),
                io::ErrorKind::TimedOut => return Some(TransportCode::TimedOut),
                _ => {}
            }
        }

        // Resolver failures are not reported with a dedicated io::ErrorKind.
        let text = err.to_string();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("Name or service not known")
        {
            return Some(TransportCode::HostNotFound);
        }

        current = err.source();
    }
    None
}

fn error_chain_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
