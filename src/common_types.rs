use rvstruct::ValueStruct;

#[derive(Debug, Clone, PartialEq, Eq, ValueStruct)]
pub struct SpeechLanguage(String);

impl Default for SpeechLanguage {
    fn default() -> Self {
        SpeechLanguage::new("en-US".to_string())
    }
}

/// Inline image reference in the `data:<mime>;base64,<payload>` form.
#[derive(Debug, Clone, PartialEq, Eq, ValueStruct)]
pub struct ImageDataUrl(String);

impl ImageDataUrl {
    const BASE64_MARKER: &'static str = ";base64,";

    /// The recognition server returns its annotated image as bare base64 JPEG.
    pub fn from_jpeg_base64(payload: &str) -> Self {
        ImageDataUrl::new(format!(
            "data:{}{}{}",
            mime::IMAGE_JPEG,
            Self::BASE64_MARKER,
            payload
        ))
    }

    pub fn base64_payload(&self) -> &str {
        self.value()
            .split_once(Self::BASE64_MARKER)
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }
}
