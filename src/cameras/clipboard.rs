use crate::cameras::{encode_still, Camera, CameraOptions, CapturedImage, PermissionStatus};
use crate::errors::AppError;
use crate::AppResult;
use arboard::Clipboard;
use image::ImageFormat;
use tracing::debug;

/// Uses whatever image is currently on the system clipboard as the still.
pub struct ClipboardCamera {
    clipboard: Option<Clipboard>,
    options: CameraOptions,
    permission: PermissionStatus,
}

impl ClipboardCamera {
    pub fn new(source: &str, options: CameraOptions) -> AppResult<Self> {
        if source != "clipboard://" {
            return Err(AppError::SystemError {
                message: "Clipboard should be specified as clipboard://".into(),
            });
        }
        Ok(Self {
            clipboard: None,
            options,
            permission: PermissionStatus::Undetermined,
        })
    }
}

impl Camera for ClipboardCamera {
    fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    async fn request_permission(&mut self) -> AppResult<PermissionStatus> {
        self.permission = match Clipboard::new() {
            Ok(clipboard) => {
                self.clipboard = Some(clipboard);
                PermissionStatus::Granted
            }
            Err(err) => {
                debug!("Unable to open clipboard: {}", err);
                PermissionStatus::Denied
            }
        };
        Ok(self.permission)
    }

    async fn capture_still(&mut self) -> AppResult<CapturedImage> {
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| AppError::CameraPermissionDenied {
                source_path: "clipboard://".to_string(),
            })?;
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs();
        let image_data = clipboard.get_image()?;
        let maybe_image: Option<image::RgbaImage> = image::ImageBuffer::from_raw(
            image_data.width as u32,
            image_data.height as u32,
            image_data.bytes.into_owned(),
        );
        match maybe_image {
            Some(image) => {
                let mut writer = std::io::Cursor::new(Vec::new());
                image.write_to(&mut writer, ImageFormat::Png)?;
                let png_image_bytes = writer.into_inner();
                debug!("Captured {} bytes from clipboard", png_image_bytes.len());
                Ok(CapturedImage {
                    local_uri: format!("clipboard://{}.png", timestamp),
                    base64: encode_still(png_image_bytes, &self.options)?,
                })
            }
            None => Err(AppError::UnsupportedImage {
                local_uri: "clipboard://".to_string(),
                message: "clipboard image has an unsupported pixel layout".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        "clipboard://".to_string()
    }
}
