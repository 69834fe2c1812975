use std::error::Error as StdError;
use std::fmt;

/// Which stage of the pipeline gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fetching a page or the PDF failed.
    Transport,
    /// The PDF could not be read or has no text.
    Pdf,
    /// An expected structural element is missing from the document.
    Layout,
    /// Writing the JSON output failed.
    Output,
    /// The configuration file is unreadable or malformed.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Pdf => "pdf",
            ErrorKind::Layout => "layout",
            ErrorKind::Output => "output",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct ScrapeError {
    pub kind: ErrorKind,
    pub message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ScrapeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ScrapeError {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn layout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Layout, message)
    }

    /// Wraps an underlying error, keeping it as the source.
    pub fn wrap<E>(kind: ErrorKind, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ScrapeError {
            kind,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn is_layout(&self) -> bool {
        self.kind == ErrorKind::Layout
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

// Anything else that fails on the way in is a transport problem unless the
// caller says otherwise through `wrap`.
impl<E: StdError + Send + Sync + 'static> From<E> for ScrapeError {
    fn from(err: E) -> Self {
        ScrapeError::wrap(ErrorKind::Transport, err)
    }
}
