use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use rsb_derive::Builder;
use tracing::{debug, warn};
use url::Url;

use crate::cameras::CapturedImage;
use crate::recognizers::{RecognitionResponse, Recognizer};
use crate::AppResult;

#[derive(Debug, Clone, Builder)]
pub struct HttpRecognizerOptions {
    /// No timeout unless the user asks for one.
    pub timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct HttpRecognizer {
    client: reqwest::Client,
}

impl HttpRecognizer {
    pub const IMAGE_FIELD: &'static str = "image_base64";

    pub fn new(options: HttpRecognizerOptions) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn form_body(image: &CapturedImage) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(Self::IMAGE_FIELD, &image.base64)
            .finish()
    }
}

impl Recognizer for HttpRecognizer {
    async fn recognize(
        &self,
        predict_url: &Url,
        image: &CapturedImage,
    ) -> AppResult<RecognitionResponse> {
        let body = Self::form_body(image);
        debug!(
            "Posting {} ({} bytes of form data) to {}",
            image.local_uri,
            body.len(),
            predict_url
        );
        let response = self
            .client
            .post(predict_url.clone())
            .header(CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .body(body)
            .send()
            .await?;

        let response_status = response.status();
        if !response_status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            warn!(
                "Recognition failed: {response_text}. HTTP status: {response_status}."
            );
            return Ok(RecognitionResponse {
                status: response_status.as_u16(),
                body: response_text,
            });
        }
        Ok(RecognitionResponse {
            status: response_status.as_u16(),
            body: response.text().await?,
        })
    }
}
