use crate::cameras::{
    encode_still, is_mime_image, Camera, CameraOptions, CapturedImage, PermissionStatus,
};
use crate::errors::AppError;
use crate::AppResult;
use std::path::PathBuf;
use tracing::debug;

/// Treats an image file on disk as the camera: every capture re-reads it,
/// so an external tool writing stills to the same path acts as the shutter.
pub struct FileCamera {
    path: PathBuf,
    options: CameraOptions,
    permission: PermissionStatus,
}

impl FileCamera {
    pub fn new(source: &str, options: CameraOptions) -> Self {
        FileCamera {
            path: PathBuf::from(source.trim_start_matches("file://")),
            options,
            permission: PermissionStatus::Undetermined,
        }
    }

    fn media_type_is_image(&self) -> bool {
        mime_guess::from_path(&self.path)
            .first()
            .iter()
            .any(is_mime_image)
    }
}

impl Camera for FileCamera {
    fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    async fn request_permission(&mut self) -> AppResult<PermissionStatus> {
        self.permission = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) if metadata.is_file() && self.media_type_is_image() => {
                PermissionStatus::Granted
            }
            Ok(_) => {
                debug!("{} is not an image file", self.path.display());
                PermissionStatus::Denied
            }
            Err(err) => {
                debug!("Unable to access {}: {}", self.path.display(), err);
                PermissionStatus::Denied
            }
        };
        Ok(self.permission)
    }

    async fn capture_still(&mut self) -> AppResult<CapturedImage> {
        if self.permission != PermissionStatus::Granted {
            return Err(AppError::CameraPermissionDenied {
                source_path: self.describe(),
            });
        }
        let data = tokio::fs::read(&self.path).await?;
        if data.is_empty() {
            return Err(AppError::UnsupportedImage {
                local_uri: self.describe(),
                message: "the file is empty".to_string(),
            });
        }
        let absolute_path = tokio::fs::canonicalize(&self.path)
            .await
            .unwrap_or_else(|_| self.path.clone());
        debug!(
            "Captured {} bytes from {}",
            data.len(),
            absolute_path.display()
        );
        Ok(CapturedImage {
            local_uri: format!("file://{}", absolute_path.display()),
            base64: encode_still(data, &self.options)?,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cameras::tests::png_bytes;
    use base64::prelude::*;

    #[tokio::test]
    async fn grants_access_to_existing_image_and_captures_it(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("still.png");
        let data = png_bytes(6, 3);
        std::fs::write(&path, &data)?;

        let mut camera = FileCamera::new(&path.to_string_lossy(), CameraOptions::default());
        assert_eq!(camera.permission_status(), PermissionStatus::Undetermined);
        assert_eq!(camera.request_permission().await?, PermissionStatus::Granted);

        let captured = camera.capture_still().await?;
        assert!(captured.local_uri.starts_with("file://"));
        assert!(captured.local_uri.ends_with("still.png"));
        assert_eq!(BASE64_STANDARD.decode(captured.base64)?, data);
        Ok(())
    }

    #[tokio::test]
    async fn denies_missing_and_non_image_files(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let dir = tempfile::tempdir()?;
        let text_path = dir.path().join("notes.txt");
        std::fs::write(&text_path, "not an image")?;

        let mut missing = FileCamera::new(
            &dir.path().join("missing.jpg").to_string_lossy(),
            CameraOptions::default(),
        );
        assert_eq!(missing.request_permission().await?, PermissionStatus::Denied);

        let mut text = FileCamera::new(&text_path.to_string_lossy(), CameraOptions::default());
        assert_eq!(text.request_permission().await?, PermissionStatus::Denied);
        assert!(matches!(
            text.capture_still().await,
            Err(AppError::CameraPermissionDenied { .. })
        ));
        Ok(())
    }
}
