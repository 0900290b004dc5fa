use console::Term;

use crate::commands::{describe_flow_setup, open_flow, run_capture, FlowOptions};
use crate::flow::{CaptureOutcome, PermissionGate, PermissionView};
use crate::reporter::AppReporter;
use crate::AppResult;

pub struct CaptureCommandResult {
    /// `None` when camera access was not granted and nothing was captured.
    pub outcome: Option<CaptureOutcome>,
}

pub async fn command_capture(term: &Term, options: FlowOptions) -> AppResult<CaptureCommandResult> {
    let (mut flow, renderer) = open_flow(&options)?;
    describe_flow_setup(term, &options, flow.speech_available())?;

    let reporter = AppReporter::from(term);
    let mut gate = PermissionGate::new();
    match gate.mount(flow.camera_mut(), &reporter).await? {
        PermissionView::Granted => {
            let outcome = run_capture(term, &mut flow, &renderer).await?;
            Ok(CaptureCommandResult {
                outcome: Some(outcome),
            })
        }
        PermissionView::Denied | PermissionView::Requesting => {
            Ok(CaptureCommandResult { outcome: None })
        }
    }
}
