use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Please enter a URL")]
    EmptyInput,

    #[error("Invalid URL: {0}")]
    MalformedUrl(String),

    #[error("Failed to fetch website: {status}")]
    FetchError { status: u16 },

    #[error("Unable to copy to clipboard: {0}")]
    ClipboardWriteFailure(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Prompt failed: {0}")]
    PromptError(String),

    #[error("Scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ScanError::EmptyInput => Some(
                "Pass a URL, e.g.:\n  schemascope schema example.com"
            ),
            ScanError::MalformedUrl(_) => Some(
                "URLs need a host name, e.g. https://example.com/page"
            ),
            ScanError::FetchError { .. } => Some(
                "The relay could not load the page. Check the URL, or point `relay_url` at another relay:\n  schemascope config path"
            ),
            ScanError::HttpError(_) => Some(
                "Check your internet connection, or scan a saved copy:\n  schemascope schema --file page.html"
            ),
            ScanError::ClipboardWriteFailure(_) => Some(
                "Install a clipboard helper (wl-copy, xclip or xsel), or use --json and pipe the output"
            ),
            ScanError::ConfigError(_) | ScanError::TomlError(_) => Some(
                "Check your configuration with `schemascope config show`"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
