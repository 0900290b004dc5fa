use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;

use crate::cameras::CapturedImage;
use crate::common_types::ImageDataUrl;
use crate::errors::AppError;
use crate::AppResult;

/// Recognition server address as typed by the user. Nothing is validated
/// here apart from a non-empty host when a URL is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: String,
}

impl ServerAddress {
    const PREDICT_PATH: &'static str = "/predict/";

    pub fn new<H: Into<String>, P: Into<String>>(host: H, port: P) -> Self {
        ServerAddress {
            host: host.into(),
            port: port.into(),
        }
    }

    pub fn has_host(&self) -> bool {
        !self.host.trim().is_empty()
    }

    pub fn base_url(&self) -> String {
        let host = self.host.trim();
        let port = self.port.trim();
        if port.is_empty() {
            format!("http://{host}")
        } else {
            format!("http://{host}:{port}")
        }
    }

    pub fn predict_url(&self) -> AppResult<Url> {
        if !self.has_host() {
            return Err(AppError::ServerAddressError {
                message: "Server host is empty. Enter the recognition server host first".to_string(),
            });
        }
        let base_url = self.base_url();
        Ok(Url::parse(&format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            Self::PREDICT_PATH
        ))?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    pub plates: Vec<String>,
    pub processed_image: Option<ImageDataUrl>,
    pub error: Option<String>,
}

impl RecognitionResult {
    pub fn clear(&mut self) {
        self.plates.clear();
        self.processed_image = None;
        self.error = None;
    }
}

/// Shared in-flight marker for the capture flow.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns `None` when a capture already holds the flag.
    pub fn engage(&self) -> Option<LoadingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LoadingGuard(self.0.clone()))
    }
}

/// Clears the loading flag when dropped, whichever way the capture ends.
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    pub address: ServerAddress,
    pub image: Option<CapturedImage>,
    pub result: RecognitionResult,
    pub loading: LoadingFlag,
}

impl ScreenState {
    pub fn new(address: ServerAddress) -> Self {
        ScreenState {
            address,
            ..ScreenState::default()
        }
    }
}
