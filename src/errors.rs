use indicatif::style::TemplateError;
use std::time::SystemTimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown capture source is specified: {source_path}")]
    UnknownCaptureSource { source_path: String },
    #[error("Input/output error")]
    InputOutputError(#[from] std::io::Error),
    #[error("Server address error: {message}")]
    ServerAddressError { message: String },
    #[error("Invalid server URL:\n{0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP client error:\n{0}")]
    HttpClientError(#[from] reqwest::Error),
    #[error("JSON error:\n{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Base64 decode error: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),
    #[error("Unsupported image '{local_uri}': {message}")]
    UnsupportedImage { local_uri: String, message: String },
    #[error("Camera permission is not granted for {source_path}")]
    CameraPermissionDenied { source_path: String },
    #[error("A capture is already in progress")]
    CaptureInProgress,
    #[error("Speech error: {message}")]
    SpeechError { message: String },
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),
    #[error("Image conversion error: {0}")]
    ImageError(#[from] image::ImageError),
    #[cfg(feature = "clipboard")]
    #[error("Clipboard error: {0}")]
    ClipboardError(#[from] arboard::Error),
    #[error("SystemTimeError: {0}")]
    SystemTimeError(#[from] SystemTimeError),
    #[error("System error: {message}")]
    SystemError { message: String },
}
