use console::Style;
use tracing::info;

use crate::cameras::{Camera, PermissionStatus};
use crate::reporter::AppReporter;
use crate::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionView {
    Requesting,
    Denied,
    Granted,
}

impl From<PermissionStatus> for PermissionView {
    fn from(status: PermissionStatus) -> Self {
        match status {
            PermissionStatus::Undetermined => PermissionView::Requesting,
            PermissionStatus::Denied => PermissionView::Denied,
            PermissionStatus::Granted => PermissionView::Granted,
        }
    }
}

/// Keeps capture controls hidden until the camera is usable. Asks at most
/// once on its own; after a denial only [`PermissionGate::request_again`] asks.
#[derive(Debug, Default)]
pub struct PermissionGate {
    requested: bool,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount<C: Camera>(
        &mut self,
        camera: &mut C,
        reporter: &AppReporter<'_>,
    ) -> AppResult<PermissionView> {
        if camera.permission_status() == PermissionStatus::Undetermined && !self.requested {
            self.request(camera, reporter).await?;
        }
        self.render(camera, reporter)
    }

    pub async fn request_again<C: Camera>(
        &mut self,
        camera: &mut C,
        reporter: &AppReporter<'_>,
    ) -> AppResult<PermissionView> {
        self.request(camera, reporter).await?;
        self.render(camera, reporter)
    }

    async fn request<C: Camera>(
        &mut self,
        camera: &mut C,
        reporter: &AppReporter<'_>,
    ) -> AppResult<()> {
        self.requested = true;
        reporter.report(format!(
            "Requesting camera access to {}...",
            Style::new().bold().apply_to(camera.describe())
        ))?;
        let status = camera.request_permission().await?;
        info!("Camera permission for {}: {:?}", camera.describe(), status);
        Ok(())
    }

    fn render<C: Camera>(&self, camera: &C, reporter: &AppReporter<'_>) -> AppResult<PermissionView> {
        let view = PermissionView::from(camera.permission_status());
        if view == PermissionView::Denied {
            reporter.report(format!(
                "{}: {} is not accessible. Request access again with 'permission'.",
                Style::new().bold().red().apply_to("Camera access denied"),
                camera.describe()
            ))?;
        }
        Ok(view)
    }
}
