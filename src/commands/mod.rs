use std::path::PathBuf;
use std::time::Duration;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cameras::{Camera, CameraOptions, DetectCamera};
use crate::flow::{CaptureOutcome, CaptureUploadFlow, ResultRenderer, ServerAddress};
use crate::recognizers::{HttpRecognizer, HttpRecognizerOptions, Recognizer};
use crate::reporter::AppReporter;
use crate::speech::{Speaker, Speakers, SpeechOptions};
use crate::AppResult;

mod capture_command;
pub use capture_command::*;

mod session_command;
pub use session_command::*;

/// Everything needed to assemble a [`CaptureUploadFlow`] from the command line.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub source: String,
    pub address: ServerAddress,
    pub camera_options: CameraOptions,
    pub recognizer_options: HttpRecognizerOptions,
    pub speech_options: SpeechOptions,
    pub save_processed: Option<PathBuf>,
}

pub type AppCaptureFlow = CaptureUploadFlow<DetectCamera, HttpRecognizer, Speakers>;

pub fn open_flow(options: &FlowOptions) -> AppResult<(AppCaptureFlow, ResultRenderer)> {
    let camera = DetectCamera::open(&options.source, options.camera_options.clone())?;
    let recognizer = HttpRecognizer::new(options.recognizer_options.clone())?;
    let speaker = Speakers::detect(&options.speech_options);
    let flow = CaptureUploadFlow::new(
        camera,
        recognizer,
        speaker,
        options.speech_options.language.clone(),
        options.address.clone(),
    );
    Ok((flow, ResultRenderer::new(options.save_processed.clone())))
}

pub fn describe_flow_setup(term: &Term, options: &FlowOptions, speaker_available: bool) -> AppResult<()> {
    let bold_style = Style::new().bold();
    let speech_output = if speaker_available {
        bold_style.clone().green().apply_to("✓ On".to_string())
    } else {
        bold_style.clone().yellow().apply_to("✗ Off".to_string())
    };
    term.write_line(
        format!(
            "Capturing from {} to {}.\nSpeech: {}.",
            bold_style.clone().white().apply_to(&options.source),
            bold_style.clone().yellow().apply_to(options.address.base_url()),
            speech_output
        )
        .as_str(),
    )?;
    Ok(())
}

/// Runs one capture under a spinner and renders what came back.
pub async fn run_capture<C: Camera, R: Recognizer, S: Speaker>(
    term: &Term,
    flow: &mut CaptureUploadFlow<C, R, S>,
    renderer: &ResultRenderer,
) -> AppResult<CaptureOutcome> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {msg}",
    )?);
    bar.set_message(format!(
        "Recognizing plates via {}",
        flow.state().address.base_url()
    ));
    bar.enable_steady_tick(Duration::from_millis(100));

    let capture_result = flow.capture().await;
    bar.finish_and_clear();
    let outcome = capture_result?;

    let reporter = AppReporter::from(term);
    renderer.render(&reporter, flow.state(), &outcome).await?;
    Ok(outcome)
}
