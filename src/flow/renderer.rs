use std::path::{Path, PathBuf};

use base64::prelude::*;
use console::Style;
use indicatif::HumanBytes;
use tracing::{error, info};

use crate::common_types::ImageDataUrl;
use crate::flow::{CaptureOutcome, NoticeLevel, ScreenState};
use crate::reporter::AppReporter;
use crate::AppResult;

#[derive(Debug, Clone, Default)]
pub struct ResultRenderer {
    save_processed: Option<PathBuf>,
}

impl ResultRenderer {
    pub fn new(save_processed: Option<PathBuf>) -> Self {
        Self { save_processed }
    }

    pub async fn render(
        &self,
        reporter: &AppReporter<'_>,
        state: &ScreenState,
        outcome: &CaptureOutcome,
    ) -> AppResult<()> {
        let bold_style = Style::new().bold();
        let dimmed_style = Style::new().dim();

        if !matches!(outcome, CaptureOutcome::ConfigurationError { .. }) {
            if let Some(image) = &state.image {
                reporter.report(format!(
                    "{} {}",
                    dimmed_style.apply_to("Original:"),
                    image.local_uri
                ))?;
            }
        }

        let notice_style = match outcome.level() {
            NoticeLevel::Success => bold_style.clone().green(),
            NoticeLevel::Warning => bold_style.clone().yellow(),
            NoticeLevel::Error => bold_style.clone().red(),
        };
        reporter.report(notice_style.apply_to(outcome.to_string()).to_string())?;

        for plate in &state.result.plates {
            reporter.report(format!("  - {}", bold_style.apply_to(plate)))?;
        }

        if let Some(processed_image) = &state.result.processed_image {
            self.render_processed_image(reporter, processed_image).await?;
        }
        Ok(())
    }

    pub fn render_status(&self, reporter: &AppReporter<'_>, state: &ScreenState) -> AppResult<()> {
        let bold_style = Style::new().bold();
        reporter.report(format!(
            "Host: {}  Port: {}  Base URL: {}",
            bold_style.apply_to(if state.address.host.is_empty() {
                "<not set>"
            } else {
                state.address.host.as_str()
            }),
            bold_style.apply_to(&state.address.port),
            bold_style.apply_to(state.address.base_url())
        ))?;
        reporter.report(format!(
            "Loading: {}",
            bold_style.apply_to(state.loading.is_loading())
        ))?;
        if let Some(image) = &state.image {
            reporter.report(format!("Last capture: {}", image.local_uri))?;
        }
        if state.result.plates.is_empty() {
            reporter.report("Plates: none")?;
        } else {
            reporter.report(format!(
                "Plates: {}",
                bold_style.apply_to(state.result.plates.join(", "))
            ))?;
        }
        if let Some(error) = &state.result.error {
            reporter.report(format!("Last server error: {error}"))?;
        }
        Ok(())
    }

    async fn render_processed_image(
        &self,
        reporter: &AppReporter<'_>,
        processed_image: &ImageDataUrl,
    ) -> AppResult<()> {
        let dimmed_style = Style::new().dim();
        match &self.save_processed {
            Some(directory) => match save_processed_image(directory, processed_image).await {
                Ok(path) => reporter.report(format!(
                    "{} {}",
                    dimmed_style.apply_to("Processed image saved to"),
                    path.display()
                )),
                Err(err) => {
                    error!("Unable to save processed image: {}", err);
                    reporter.report(format!(
                        "{}: {}",
                        Style::new().yellow().apply_to("Processed image could not be saved"),
                        err
                    ))
                }
            },
            None => reporter.report(format!(
                "{} {} (use --save-processed to keep it)",
                dimmed_style.apply_to("Processed image:"),
                HumanBytes(estimated_decoded_len(processed_image.base64_payload()))
            )),
        }
    }
}

pub async fn save_processed_image(
    directory: &Path,
    processed_image: &ImageDataUrl,
) -> AppResult<PathBuf> {
    let data = BASE64_STANDARD.decode(processed_image.base64_payload())?;
    let extension = image::guess_format(&data)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg");
    tokio::fs::create_dir_all(directory).await?;
    let path = directory.join(format!(
        "processed-{}.{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S%.3f"),
        extension
    ));
    tokio::fs::write(&path, &data).await?;
    info!("Saved processed image to {}", path.display());
    Ok(path)
}

fn estimated_decoded_len(base64_payload: &str) -> u64 {
    let padding = base64_payload.chars().rev().take_while(|c| *c == '=').count();
    ((base64_payload.len() / 4) * 3).saturating_sub(padding) as u64
}
