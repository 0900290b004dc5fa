use std::sync::{Arc, Mutex};

use url::Url;

use crate::cameras::{Camera, CapturedImage, PermissionStatus};
use crate::common_types::SpeechLanguage;
use crate::errors::AppError;
use crate::flow::{CaptureUploadFlow, LoadingFlag, ServerAddress};
use crate::recognizers::{RecognitionResponse, Recognizer};
use crate::speech::Speaker;
use crate::AppResult;

pub struct ScriptedCamera {
    pub status: PermissionStatus,
    pub grant_on_request: Vec<bool>,
    pub requests: usize,
    pub captures: usize,
    pub fail_capture: bool,
}

impl ScriptedCamera {
    pub fn granted() -> Self {
        ScriptedCamera {
            status: PermissionStatus::Granted,
            grant_on_request: Vec::new(),
            requests: 0,
            captures: 0,
            fail_capture: false,
        }
    }

    pub fn undetermined(grant_on_request: Vec<bool>) -> Self {
        ScriptedCamera {
            status: PermissionStatus::Undetermined,
            grant_on_request,
            ..Self::granted()
        }
    }
}

impl Camera for ScriptedCamera {
    fn permission_status(&self) -> PermissionStatus {
        self.status
    }

    async fn request_permission(&mut self) -> AppResult<PermissionStatus> {
        let granted = self
            .grant_on_request
            .get(self.requests)
            .copied()
            .unwrap_or(false);
        self.requests += 1;
        self.status = if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        Ok(self.status)
    }

    async fn capture_still(&mut self) -> AppResult<CapturedImage> {
        self.captures += 1;
        if self.fail_capture {
            return Err(AppError::SystemError {
                message: "shutter jammed".to_string(),
            });
        }
        Ok(CapturedImage {
            local_uri: format!("file:///tmp/still-{}.jpg", self.captures),
            base64: "/9j/4AAQ".to_string(),
        })
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Shared view into what the canned collaborators saw.
#[derive(Default, Clone)]
pub struct Probe {
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
    pub loading_seen: Arc<Mutex<Vec<bool>>>,
    pub loading_flag: Arc<Mutex<Option<LoadingFlag>>>,
    pub spoken: Arc<Mutex<Vec<String>>>,
}

pub struct CannedRecognizer {
    /// `None` simulates a transport failure.
    pub response: Option<RecognitionResponse>,
    pub probe: Probe,
}

impl Recognizer for CannedRecognizer {
    async fn recognize(
        &self,
        predict_url: &Url,
        image: &CapturedImage,
    ) -> AppResult<RecognitionResponse> {
        self.probe
            .requests
            .lock()
            .unwrap()
            .push((predict_url.to_string(), image.base64.clone()));
        if let Some(flag) = self.probe.loading_flag.lock().unwrap().as_ref() {
            self.probe
                .loading_seen
                .lock()
                .unwrap()
                .push(flag.is_loading());
        }
        self.response.clone().ok_or_else(|| AppError::SystemError {
            message: "connection reset".to_string(),
        })
    }
}

pub struct RecordingSpeaker {
    pub probe: Probe,
}

impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str, _language: &SpeechLanguage) -> AppResult<()> {
        self.probe.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

pub type TestFlow = CaptureUploadFlow<ScriptedCamera, CannedRecognizer, RecordingSpeaker>;

pub fn flow_with(host: &str, status: u16, body: &str) -> (TestFlow, Probe) {
    flow_responding(
        ScriptedCamera::granted(),
        host,
        Some(RecognitionResponse {
            status,
            body: body.to_string(),
        }),
    )
}

pub fn flow_responding(
    camera: ScriptedCamera,
    host: &str,
    response: Option<RecognitionResponse>,
) -> (TestFlow, Probe) {
    let probe = Probe::default();
    let flow = CaptureUploadFlow::new(
        camera,
        CannedRecognizer {
            response,
            probe: probe.clone(),
        },
        RecordingSpeaker {
            probe: probe.clone(),
        },
        SpeechLanguage::default(),
        ServerAddress::new(host, "8000"),
    );
    *probe.loading_flag.lock().unwrap() = Some(flow.loading_flag());
    (flow, probe)
}
