use console::{Style, Term};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::cameras::Camera;
use crate::commands::{describe_flow_setup, open_flow, run_capture, FlowOptions};
use crate::flow::{CaptureUploadFlow, PermissionGate, PermissionView, ResultRenderer};
use crate::recognizers::Recognizer;
use crate::reporter::AppReporter;
use crate::speech::Speaker;
use crate::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Host(String),
    Port(String),
    Capture,
    Permission,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    pub const HELP: &'static str = "Commands:
  host <host>   set the recognition server host
  port <port>   set the recognition server port
  capture       capture a still and recognize plates (or just press Enter)
  permission    request camera access again
  status        show the server address and the last result
  help          show this help
  quit          leave the session";

    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, argument) = line
            .split_once(char::is_whitespace)
            .map(|(command, argument)| (command, argument.trim()))
            .unwrap_or((line, ""));
        match command.to_lowercase().as_str() {
            "" | "capture" | "c" => SessionCommand::Capture,
            "host" => SessionCommand::Host(argument.to_string()),
            "port" => SessionCommand::Port(argument.to_string()),
            "permission" => SessionCommand::Permission,
            "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            _ => SessionCommand::Unknown(line.to_string()),
        }
    }
}

pub struct SessionCommandResult {
    pub captures: usize,
}

pub async fn command_session(term: &Term, options: FlowOptions) -> AppResult<SessionCommandResult> {
    let (mut flow, renderer) = open_flow(&options)?;
    describe_flow_setup(term, &options, flow.speech_available())?;
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    run_session(term, &mut flow, &renderer, input).await
}

pub async fn run_session<C, R, S, I>(
    term: &Term,
    flow: &mut CaptureUploadFlow<C, R, S>,
    renderer: &ResultRenderer,
    input: I,
) -> AppResult<SessionCommandResult>
where
    C: Camera,
    R: Recognizer,
    S: Speaker,
    I: AsyncBufRead + Unpin,
{
    let bold_style = Style::new().bold();
    let reporter = AppReporter::from(term);
    let mut gate = PermissionGate::new();
    let mut view = gate.mount(flow.camera_mut(), &reporter).await?;
    reporter.report(SessionCommand::HELP)?;

    let mut lines = input.lines();
    let mut captures = 0;
    loop {
        term.write_str("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = SessionCommand::parse(&line);
        debug!("Session command: {:?}", command);
        match command {
            SessionCommand::Host(host) => {
                flow.address_mut().host = host;
                reporter.report(format!(
                    "Base URL: {}",
                    bold_style.apply_to(flow.state().address.base_url())
                ))?;
            }
            SessionCommand::Port(port) => {
                flow.address_mut().port = port;
                reporter.report(format!(
                    "Base URL: {}",
                    bold_style.apply_to(flow.state().address.base_url())
                ))?;
            }
            SessionCommand::Capture if view == PermissionView::Granted => {
                run_capture(term, flow, renderer).await?;
                captures += 1;
            }
            SessionCommand::Capture => {
                reporter.report(format!(
                    "{}. Type 'permission' to request it again.",
                    Style::new().yellow().apply_to("Camera access is required to capture")
                ))?;
            }
            SessionCommand::Permission => {
                view = gate.request_again(flow.camera_mut(), &reporter).await?;
                if view == PermissionView::Granted {
                    reporter.report(
                        bold_style
                            .clone()
                            .green()
                            .apply_to("Camera access granted")
                            .to_string(),
                    )?;
                }
            }
            SessionCommand::Status => renderer.render_status(&reporter, flow.state())?,
            SessionCommand::Help => reporter.report(SessionCommand::HELP)?,
            SessionCommand::Quit => break,
            SessionCommand::Unknown(line) => {
                reporter.report(format!("Unknown command '{line}'. Type 'help'."))?
            }
        }
    }
    Ok(SessionCommandResult { captures })
}
