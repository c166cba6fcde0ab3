use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchlinkError {
    InvalidUrl(String),
    InvalidShortcode(String),
    CodeTaken(String),
    GenerationExhausted(String),
    NotFound(String),
    Expired(String),
    NoUrlsProvided(String),
    Validation(String),
    FileOperation(String),
    Serialization(String),
}

impl BatchlinkError {
    pub fn code(&self) -> &'static str {
        match self {
            BatchlinkError::InvalidUrl(_) => "E001",
            BatchlinkError::InvalidShortcode(_) => "E002",
            BatchlinkError::CodeTaken(_) => "E003",
            BatchlinkError::GenerationExhausted(_) => "E004",
            BatchlinkError::NotFound(_) => "E005",
            BatchlinkError::Expired(_) => "E006",
            BatchlinkError::NoUrlsProvided(_) => "E007",
            BatchlinkError::Validation(_) => "E008",
            BatchlinkError::FileOperation(_) => "E009",
            BatchlinkError::Serialization(_) => "E010",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            BatchlinkError::InvalidUrl(_) => "Invalid URL",
            BatchlinkError::InvalidShortcode(_) => "Invalid Shortcode",
            BatchlinkError::CodeTaken(_) => "Shortcode Taken",
            BatchlinkError::GenerationExhausted(_) => "Code Generation Exhausted",
            BatchlinkError::NotFound(_) => "Resource Not Found",
            BatchlinkError::Expired(_) => "Link Expired",
            BatchlinkError::NoUrlsProvided(_) => "No URLs Provided",
            BatchlinkError::Validation(_) => "Validation Error",
            BatchlinkError::FileOperation(_) => "File Operation Error",
            BatchlinkError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            BatchlinkError::InvalidUrl(msg) => msg,
            BatchlinkError::InvalidShortcode(msg) => msg,
            BatchlinkError::CodeTaken(msg) => msg,
            BatchlinkError::GenerationExhausted(msg) => msg,
            BatchlinkError::NotFound(msg) => msg,
            BatchlinkError::Expired(msg) => msg,
            BatchlinkError::NoUrlsProvided(msg) => msg,
            BatchlinkError::Validation(msg) => msg,
            BatchlinkError::FileOperation(msg) => msg,
            BatchlinkError::Serialization(msg) => msg,
        }
    }

    /// HTTP status the handlers report this error with.
    ///
    /// `NotFound` and `Expired` must map to distinct statuses so callers can
    /// tell an unknown code apart from one whose validity window elapsed.
    pub fn http_status(&self) -> StatusCode {
        match self {
            BatchlinkError::InvalidUrl(_)
            | BatchlinkError::InvalidShortcode(_)
            | BatchlinkError::NoUrlsProvided(_)
            | BatchlinkError::Validation(_) => StatusCode::BAD_REQUEST,
            BatchlinkError::CodeTaken(_) => StatusCode::CONFLICT,
            BatchlinkError::NotFound(_) => StatusCode::NOT_FOUND,
            BatchlinkError::Expired(_) => StatusCode::GONE,
            BatchlinkError::GenerationExhausted(_)
            | BatchlinkError::FileOperation(_)
            | BatchlinkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BatchlinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BatchlinkError {}

// 便捷的构造函数
impl BatchlinkError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::InvalidUrl(msg.into())
    }

    pub fn invalid_shortcode<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::InvalidShortcode(msg.into())
    }

    pub fn code_taken<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::CodeTaken(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::GenerationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::Expired(msg.into())
    }

    pub fn no_urls_provided<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::NoUrlsProvided(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::Validation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BatchlinkError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for BatchlinkError {
    fn from(err: std::io::Error) -> Self {
        BatchlinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BatchlinkError {
    fn from(err: serde_json::Error) -> Self {
        BatchlinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BatchlinkError>;
