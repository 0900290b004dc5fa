use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, warn};

use crate::common_types::ImageDataUrl;
use crate::recognizers::RecognitionResponse;

/// Every way a single capture can end. All of them are rendered as a notice;
/// none of them stops the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Recognized {
        plates: Vec<String>,
        processed_image: Option<ImageDataUrl>,
    },
    EmptyResult,
    ConfigurationError {
        message: String,
    },
    HttpStatusError {
        status: u16,
    },
    ServerReportedError {
        message: String,
    },
    UnexpectedShape {
        raw: String,
    },
    TransportError {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl CaptureOutcome {
    const PLATES_FIELD: &'static str = "placas";
    const IMAGE_FIELD: &'static str = "image";
    const ERROR_FIELD: &'static str = "error";
    const PLATE_SEPARATOR: &'static str = ", ";

    pub fn classify(response: &RecognitionResponse) -> Self {
        if !response.is_success() {
            return CaptureOutcome::HttpStatusError {
                status: response.status,
            };
        }

        let json: Value = match serde_json::from_str(&response.body) {
            Ok(json) => json,
            Err(err) => {
                warn!("Recognition server returned invalid JSON: {}", err);
                return CaptureOutcome::connection_failed();
            }
        };

        match json.get(Self::PLATES_FIELD) {
            Some(Value::Array(items)) if items.is_empty() => CaptureOutcome::EmptyResult,
            Some(Value::Array(items)) => {
                let plates = items.iter().map(json_text).collect();
                let processed_image = json
                    .get(Self::IMAGE_FIELD)
                    .and_then(Value::as_str)
                    .filter(|payload| !payload.is_empty())
                    .map(ImageDataUrl::from_jpeg_base64);
                CaptureOutcome::Recognized {
                    plates,
                    processed_image,
                }
            }
            _ => match json.get(Self::ERROR_FIELD) {
                Some(error) => CaptureOutcome::ServerReportedError {
                    message: json_text(error),
                },
                None => {
                    debug!("Unrecognised response shape: {}", response.body);
                    CaptureOutcome::UnexpectedShape {
                        raw: response.body.clone(),
                    }
                }
            },
        }
    }

    pub fn connection_failed() -> Self {
        CaptureOutcome::TransportError {
            message: "Could not connect to the recognition server".to_string(),
        }
    }

    pub fn capture_failed(source: &str) -> Self {
        CaptureOutcome::TransportError {
            message: format!("Could not capture an image from {source}"),
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            CaptureOutcome::Recognized { .. } => NoticeLevel::Success,
            CaptureOutcome::EmptyResult | CaptureOutcome::UnexpectedShape { .. } => {
                NoticeLevel::Warning
            }
            CaptureOutcome::ConfigurationError { .. }
            | CaptureOutcome::HttpStatusError { .. }
            | CaptureOutcome::ServerReportedError { .. }
            | CaptureOutcome::TransportError { .. } => NoticeLevel::Error,
        }
    }

    /// Text for the speech capability. Configuration problems and unexpected
    /// responses are shown but never spoken.
    pub fn spoken_text(&self) -> Option<String> {
        match self {
            CaptureOutcome::Recognized { plates, .. } => match plates.as_slice() {
                [plate] => Some(format!("Plate detected: {}", spell_plate(plate))),
                plates => Some(format!(
                    "{} plates detected: {}",
                    plates.len(),
                    plates.join(Self::PLATE_SEPARATOR)
                )),
            },
            CaptureOutcome::EmptyResult => Some("No plates detected".to_string()),
            CaptureOutcome::HttpStatusError { .. } => {
                Some("Failed to process the image".to_string())
            }
            CaptureOutcome::ServerReportedError { .. } => {
                Some("The server reported an error".to_string())
            }
            CaptureOutcome::TransportError { message } => Some(message.clone()),
            CaptureOutcome::ConfigurationError { .. } | CaptureOutcome::UnexpectedShape { .. } => {
                None
            }
        }
    }
}

impl Display for CaptureOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureOutcome::Recognized { plates, .. } if plates.len() == 1 => {
                write!(f, "Plate detected: {}", plates[0])
            }
            CaptureOutcome::Recognized { plates, .. } => write!(
                f,
                "{} plates detected: {}",
                plates.len(),
                plates.join(Self::PLATE_SEPARATOR)
            ),
            CaptureOutcome::EmptyResult => write!(f, "No plates detected in the image"),
            CaptureOutcome::ConfigurationError { message } => {
                write!(f, "Configuration error: {message}")
            }
            CaptureOutcome::HttpStatusError { status } => write!(f, "HTTP error: {status}"),
            CaptureOutcome::ServerReportedError { message } => {
                write!(f, "Server error: {message}")
            }
            CaptureOutcome::UnexpectedShape { raw } => write!(f, "Unexpected response: {raw}"),
            CaptureOutcome::TransportError { message } => {
                write!(f, "{message}. Check the host, the port and your network")
            }
        }
    }
}

/// `ABC123` becomes `A B C 1 2 3` so speech engines read it character by character.
pub fn spell_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn json_text(value: &Value) -> String {
    value
        .as_str()
        .map(|s| s.to_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> RecognitionResponse {
        RecognitionResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn non_success_status_wins_over_body() {
        let outcome = CaptureOutcome::classify(&RecognitionResponse {
            status: 500,
            body: r#"{"placas":["ABC123"]}"#.to_string(),
        });
        assert_eq!(outcome, CaptureOutcome::HttpStatusError { status: 500 });
        assert_eq!(outcome.to_string(), "HTTP error: 500");
        assert!(outcome.spoken_text().is_some());
    }

    #[test]
    fn single_plate_is_spelled_out() {
        let outcome = CaptureOutcome::classify(&ok(r#"{"placas":["ABC123"]}"#));
        assert_eq!(
            outcome,
            CaptureOutcome::Recognized {
                plates: vec!["ABC123".to_string()],
                processed_image: None
            }
        );
        assert_eq!(
            outcome.spoken_text().as_deref(),
            Some("Plate detected: A B C 1 2 3")
        );
    }

    #[test]
    fn several_plates_are_counted_and_joined() {
        let outcome = CaptureOutcome::classify(&ok(
            r#"{"placas":["ABC123","XYZ987"],"image":"/9j/4AAQ"}"#,
        ));
        match &outcome {
            CaptureOutcome::Recognized {
                plates,
                processed_image,
            } => {
                assert_eq!(plates, &vec!["ABC123".to_string(), "XYZ987".to_string()]);
                assert_eq!(
                    processed_image.as_ref().map(|url| url.base64_payload()),
                    Some("/9j/4AAQ")
                );
            }
            other => panic!("Unexpected outcome: {other:?}"),
        }
        assert_eq!(
            outcome.spoken_text().as_deref(),
            Some("2 plates detected: ABC123, XYZ987")
        );
    }

    #[test]
    fn empty_plate_list_is_its_own_notice() {
        let outcome = CaptureOutcome::classify(&ok(r#"{"placas":[]}"#));
        assert_eq!(outcome, CaptureOutcome::EmptyResult);
        assert_eq!(outcome.level(), NoticeLevel::Warning);
        assert_eq!(outcome.spoken_text().as_deref(), Some("No plates detected"));
    }

    #[test]
    fn server_error_message_is_surfaced() {
        let outcome = CaptureOutcome::classify(&ok(r#"{"error":"model not loaded"}"#));
        assert_eq!(
            outcome,
            CaptureOutcome::ServerReportedError {
                message: "model not loaded".to_string()
            }
        );
        assert_eq!(
            outcome.spoken_text().as_deref(),
            Some("The server reported an error")
        );

        let structured = CaptureOutcome::classify(&ok(r#"{"error":{"code":7}}"#));
        assert_eq!(
            structured,
            CaptureOutcome::ServerReportedError {
                message: r#"{"code":7}"#.to_string()
            }
        );
    }

    #[test]
    fn unknown_shape_keeps_raw_json_and_stays_silent() {
        let outcome = CaptureOutcome::classify(&ok(r#"{"foo": "bar"}"#));
        assert_eq!(
            outcome,
            CaptureOutcome::UnexpectedShape {
                raw: r#"{"foo": "bar"}"#.to_string()
            }
        );
        assert_eq!(outcome.to_string(), r#"Unexpected response: {"foo": "bar"}"#);
        assert_eq!(outcome.spoken_text(), None);
    }

    #[test]
    fn invalid_json_is_a_transport_error() {
        let outcome = CaptureOutcome::classify(&ok("<html>gateway</html>"));
        assert!(matches!(outcome, CaptureOutcome::TransportError { .. }));
        assert_eq!(outcome.level(), NoticeLevel::Error);
    }

    #[test]
    fn spelling_ignores_whitespace() {
        assert_eq!(spell_plate("AB 12"), "A B 1 2");
        assert_eq!(spell_plate(""), "");
    }
}
