use crate::common_types::SpeechLanguage;
use crate::AppResult;

mod command;
pub use command::*;

mod noop;
pub use noop::*;

#[derive(Debug, Clone, Default)]
pub struct SpeechOptions {
    pub enabled: bool,
    pub language: SpeechLanguage,
    /// Overrides the platform text-to-speech program, e.g. `espeak-ng -s 150`.
    pub command: Option<String>,
}

pub trait Speaker {
    async fn speak(&self, text: &str, language: &SpeechLanguage) -> AppResult<()>;

    fn is_available(&self) -> bool;
}

pub enum Speakers {
    Command(CommandSpeaker),
    Noop(NoopSpeaker),
}

impl Speakers {
    /// Picks the speech capability for this platform. Platforms without a
    /// known text-to-speech program get the no-op variant.
    pub fn detect(options: &SpeechOptions) -> Self {
        if !options.enabled {
            return Speakers::Noop(NoopSpeaker);
        }
        match options.command.as_deref() {
            Some(command_line) => CommandSpeaker::from_command_line(command_line)
                .map(Speakers::Command)
                .unwrap_or(Speakers::Noop(NoopSpeaker)),
            None => CommandSpeaker::for_platform(std::env::consts::OS)
                .map(Speakers::Command)
                .unwrap_or(Speakers::Noop(NoopSpeaker)),
        }
    }
}

impl Speaker for Speakers {
    async fn speak(&self, text: &str, language: &SpeechLanguage) -> AppResult<()> {
        match self {
            Speakers::Command(speaker) => speaker.speak(text, language).await,
            Speakers::Noop(speaker) => speaker.speak(text, language).await,
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Speakers::Command(speaker) => speaker.is_available(),
            Speakers::Noop(speaker) => speaker.is_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_speech_is_noop() {
        let speaker = Speakers::detect(&SpeechOptions {
            enabled: false,
            language: SpeechLanguage::default(),
            command: Some("espeak-ng".to_string()),
        });
        assert!(matches!(speaker, Speakers::Noop(_)));
        assert!(!speaker.is_available());
    }

    #[test]
    fn explicit_command_wins_over_platform_default() {
        let speaker = Speakers::detect(&SpeechOptions {
            enabled: true,
            language: SpeechLanguage::default(),
            command: Some("my-tts --fast".to_string()),
        });
        assert!(matches!(speaker, Speakers::Command(_)));
    }

    #[test]
    fn blank_command_falls_back_to_noop() {
        let speaker = Speakers::detect(&SpeechOptions {
            enabled: true,
            language: SpeechLanguage::default(),
            command: Some("   ".to_string()),
        });
        assert!(matches!(speaker, Speakers::Noop(_)));
    }
}
