use tracing::{error, info, warn};
use url::Url;

use crate::cameras::Camera;
use crate::common_types::SpeechLanguage;
use crate::errors::AppError;
use crate::flow::{CaptureOutcome, LoadingFlag, ScreenState, ServerAddress};
use crate::recognizers::Recognizer;
use crate::speech::Speaker;
use crate::AppResult;

/// Capture a still, upload it, keep the result. One instance per screen.
pub struct CaptureUploadFlow<C: Camera, R: Recognizer, S: Speaker> {
    camera: C,
    recognizer: R,
    speaker: S,
    language: SpeechLanguage,
    state: ScreenState,
}

impl<C: Camera, R: Recognizer, S: Speaker> CaptureUploadFlow<C, R, S> {
    pub fn new(
        camera: C,
        recognizer: R,
        speaker: S,
        language: SpeechLanguage,
        address: ServerAddress,
    ) -> Self {
        Self {
            camera,
            recognizer,
            speaker,
            language,
            state: ScreenState::new(address),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn address_mut(&mut self) -> &mut ServerAddress {
        &mut self.state.address
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn speech_available(&self) -> bool {
        self.speaker.is_available()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.state.loading.clone()
    }

    /// Runs one capture end to end. Failures of the capture itself come back
    /// as a [`CaptureOutcome`]; `Err` is reserved for a capture that is
    /// already in flight.
    pub async fn capture(&mut self) -> AppResult<CaptureOutcome> {
        let predict_url = match self.state.address.predict_url() {
            Ok(predict_url) => predict_url,
            Err(err) => {
                warn!("Capture rejected: {}", err);
                return Ok(CaptureOutcome::ConfigurationError {
                    message: match err {
                        AppError::ServerAddressError { message } => message,
                        other => other.to_string(),
                    },
                });
            }
        };

        let _loading = self
            .state
            .loading
            .engage()
            .ok_or(AppError::CaptureInProgress)?;
        self.state.result.clear();

        let outcome = self.capture_and_recognize(&predict_url).await;
        self.apply(&outcome);
        self.announce(&outcome).await;
        info!("Capture finished: {}", outcome);
        Ok(outcome)
    }

    async fn capture_and_recognize(&mut self, predict_url: &Url) -> CaptureOutcome {
        let image = match self.camera.capture_still().await {
            Ok(image) => image,
            Err(err) => {
                error!("Capture from {} failed: {}", self.camera.describe(), err);
                return CaptureOutcome::capture_failed(&self.camera.describe());
            }
        };
        let image = self.state.image.insert(image);

        match self.recognizer.recognize(predict_url, image).await {
            Ok(response) => CaptureOutcome::classify(&response),
            Err(err) => {
                error!("Recognition request to {} failed: {}", predict_url, err);
                CaptureOutcome::connection_failed()
            }
        }
    }

    fn apply(&mut self, outcome: &CaptureOutcome) {
        let result = &mut self.state.result;
        match outcome {
            CaptureOutcome::Recognized {
                plates,
                processed_image,
            } => {
                result.plates = plates.clone();
                result.processed_image = processed_image.clone();
                result.error = None;
            }
            CaptureOutcome::ServerReportedError { message } => {
                result.error = Some(message.clone());
            }
            _ => {}
        }
    }

    async fn announce(&self, outcome: &CaptureOutcome) {
        if let Some(text) = outcome.spoken_text() {
            if let Err(err) = self.speaker.speak(&text, &self.language).await {
                warn!("Spoken feedback failed: {}", err);
            }
        }
    }
}
