use crate::common_types::SpeechLanguage;
use crate::speech::Speaker;
use crate::AppResult;
use rvstruct::ValueStruct;
use tracing::debug;

/// Speech capability for platforms that have none.
#[derive(Debug, Clone, Copy)]
pub struct NoopSpeaker;

impl Speaker for NoopSpeaker {
    async fn speak(&self, text: &str, language: &SpeechLanguage) -> AppResult<()> {
        debug!("Speech unavailable, skipping ({}): {}", language.value(), text);
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}
