use crate::cameras::CapturedImage;
use crate::AppResult;
use url::Url;

mod http;
pub use http::*;

/// What came back from the recognition server before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResponse {
    pub status: u16,
    pub body: String,
}

impl RecognitionResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Recognizer {
    async fn recognize(
        &self,
        predict_url: &Url,
        image: &CapturedImage,
    ) -> AppResult<RecognitionResponse>;
}
