use crate::cameras::CameraOptions;
use crate::commands::FlowOptions;
use crate::common_types::SpeechLanguage;
use crate::errors::AppError;
use crate::flow::ServerAddress;
use crate::recognizers::HttpRecognizerOptions;
use crate::speech::SpeechOptions;
use clap::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Log diagnostics to stderr (same as RUST_LOG=plate_reader=debug)"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    #[command(about = "Capture a single still and recognize the plates on it")]
    Capture {
        #[command(flatten)]
        flow_args: FlowArgs,
    },
    #[command(
        about = "Interactive session: edit the server address and capture as many times as needed"
    )]
    Session {
        #[command(flatten)]
        flow_args: FlowArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FlowArgs {
    #[arg(
        short = 's',
        long,
        help = "Capture source: an image file such as /tmp/frame.jpg (re-read on every capture) or clipboard://"
    )]
    pub source: String,

    #[command(flatten)]
    pub server_args: ServerArgs,

    #[command(flatten)]
    pub speech_args: SpeechArgs,

    #[arg(
        long,
        help = "Downsize stills so neither side exceeds this many pixels before uploading"
    )]
    pub max_dimension: Option<u32>,

    #[arg(long, help = "Directory to save the processed image returned by the server")]
    pub save_processed: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(
        long,
        env = "PLATE_READER_HOST",
        default_value = "",
        help = "Recognition server host, e.g. 192.168.1.20"
    )]
    pub host: String,

    #[arg(
        short = 'p',
        long,
        env = "PLATE_READER_PORT",
        default_value = "8000",
        help = "Recognition server port"
    )]
    pub port: String,

    #[arg(
        long,
        env = "PLATE_READER_TIMEOUT_SECS",
        help = "Request timeout in seconds. Without it a request waits for the server indefinitely"
    )]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct SpeechArgs {
    #[arg(long, help = "Disable spoken feedback", default_value = "false")]
    pub no_speech: bool,

    #[arg(
        long,
        env = "PLATE_READER_SPEECH_LANGUAGE",
        default_value = "en-US",
        help = "Language passed to the text-to-speech program"
    )]
    pub speech_language: String,

    #[arg(
        long,
        env = "PLATE_READER_SPEECH_COMMAND",
        help = "Text-to-speech program to use instead of the platform default (espeak-ng or say)"
    )]
    pub speech_command: Option<String>,
}

impl TryInto<FlowOptions> for FlowArgs {
    type Error = AppError;

    fn try_into(self) -> Result<FlowOptions, Self::Error> {
        let timeout = match self.server_args.timeout_secs {
            Some(0) => Err(AppError::ServerAddressError {
                message: "Timeout should be more than zero seconds".to_string(),
            }),
            other => Ok(other.map(Duration::from_secs)),
        }?;
        if self.max_dimension == Some(0) {
            return Err(AppError::SystemError {
                message: "Maximum image dimension should be more than zero".to_string(),
            });
        }
        Ok(FlowOptions {
            source: self.source,
            address: ServerAddress::new(self.server_args.host, self.server_args.port),
            camera_options: CameraOptions {
                max_dimension: self.max_dimension,
            },
            recognizer_options: HttpRecognizerOptions::new().opt_timeout(timeout),
            speech_options: SpeechOptions {
                enabled: !self.speech_args.no_speech,
                language: SpeechLanguage::new(self.speech_args.speech_language),
                command: self.speech_args.speech_command,
            },
            save_processed: self.save_processed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> FlowArgs {
        let cli = CliArgs::try_parse_from(args).expect("arguments parse");
        match cli.command {
            CliCommand::Capture { flow_args } | CliCommand::Session { flow_args } => flow_args,
        }
    }

    #[test]
    fn converts_arguments_to_flow_options() -> crate::AppResult<()> {
        let options: FlowOptions = parse(&[
            "plate-reader",
            "capture",
            "--source",
            "/tmp/frame.jpg",
            "--host",
            "10.0.0.5",
            "--port",
            "8080",
            "--timeout-secs",
            "15",
            "--no-speech",
        ])
        .try_into()?;

        assert_eq!(options.address, ServerAddress::new("10.0.0.5", "8080"));
        assert_eq!(options.recognizer_options.timeout, Some(Duration::from_secs(15)));
        assert!(!options.speech_options.enabled);
        assert_eq!(options.source, "/tmp/frame.jpg");
        Ok(())
    }

    #[test]
    fn no_timeout_unless_requested() -> crate::AppResult<()> {
        let options: FlowOptions =
            parse(&["plate-reader", "session", "-s", "clipboard://", "--host", "h"]).try_into()?;
        assert_eq!(options.recognizer_options.timeout, None);
        assert_eq!(options.address.port, "8000");
        assert!(options.speech_options.enabled);
        Ok(())
    }

    #[test]
    fn rejects_zero_timeout() {
        let result: Result<FlowOptions, AppError> = parse(&[
            "plate-reader",
            "capture",
            "-s",
            "/tmp/frame.jpg",
            "--timeout-secs",
            "0",
        ])
        .try_into();
        assert!(result.is_err());
    }
}
