use crate::common_types::SpeechLanguage;
use crate::errors::AppError;
use crate::speech::Speaker;
use crate::AppResult;
use rvstruct::ValueStruct;
use std::process::Stdio;
use tracing::debug;

/// Speaks by running an external text-to-speech program with the text as its last argument.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    language_flag: Option<String>,
}

impl CommandSpeaker {
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(|s| s.to_string());
        parts.next().map(|program| CommandSpeaker {
            program,
            args: parts.collect(),
            language_flag: None,
        })
    }

    pub fn for_platform(os: &str) -> Option<Self> {
        match os {
            "linux" | "freebsd" | "openbsd" | "netbsd" => Some(CommandSpeaker {
                program: "espeak-ng".to_string(),
                args: Vec::new(),
                language_flag: Some("-v".to_string()),
            }),
            "macos" => Some(CommandSpeaker {
                program: "say".to_string(),
                args: Vec::new(),
                language_flag: None,
            }),
            _ => None,
        }
    }

    pub fn arguments(&self, text: &str, language: &SpeechLanguage) -> Vec<String> {
        let mut arguments = self.args.clone();
        if let Some(flag) = &self.language_flag {
            arguments.push(flag.clone());
            arguments.push(language.value().to_lowercase());
        }
        arguments.push(text.to_string());
        arguments
    }
}

impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str, language: &SpeechLanguage) -> AppResult<()> {
        debug!("Speaking with {}: {}", self.program, text);
        let status = tokio::process::Command::new(&self.program)
            .args(self.arguments(text, language))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| AppError::SpeechError {
                message: format!("Failed to run {}: {}", self.program, e),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(AppError::SpeechError {
                message: format!("{} exited with {}", self.program, status),
            })
        }
    }

    fn is_available(&self) -> bool {
        true
    }
}
