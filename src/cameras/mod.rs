use crate::errors::AppError;
use crate::AppResult;
use base64::prelude::*;
use image::ImageFormat;
use mime::Mime;
use std::io::Cursor;
use tracing::debug;

mod file;
pub use file::*;

#[cfg(feature = "clipboard")]
mod clipboard;
#[cfg(feature = "clipboard")]
pub use clipboard::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Undetermined,
    Granted,
    Denied,
}

/// A still frame as handed to the upload client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub local_uri: String,
    /// Raw base64 of the encoded image, without any `data:` prefix.
    pub base64: String,
}

#[derive(Debug, Clone, Default)]
pub struct CameraOptions {
    pub max_dimension: Option<u32>,
}

pub trait Camera {
    fn permission_status(&self) -> PermissionStatus;

    async fn request_permission(&mut self) -> AppResult<PermissionStatus>;

    async fn capture_still(&mut self) -> AppResult<CapturedImage>;

    fn describe(&self) -> String;
}

pub enum DetectCamera {
    File(FileCamera),
    #[cfg(feature = "clipboard")]
    Clipboard(ClipboardCamera),
}

impl DetectCamera {
    pub fn open(source: &str, options: CameraOptions) -> AppResult<Self> {
        if source.starts_with("file://") || !source.contains("://") {
            Ok(DetectCamera::File(FileCamera::new(source, options)))
        } else if source.starts_with("clipboard://") {
            #[cfg(feature = "clipboard")]
            {
                Ok(DetectCamera::Clipboard(ClipboardCamera::new(
                    source, options,
                )?))
            }
            #[cfg(not(feature = "clipboard"))]
            {
                Err(AppError::UnknownCaptureSource {
                    source_path: source.to_string(),
                })
            }
        } else {
            Err(AppError::UnknownCaptureSource {
                source_path: source.to_string(),
            })
        }
    }
}

impl Camera for DetectCamera {
    fn permission_status(&self) -> PermissionStatus {
        match self {
            DetectCamera::File(camera) => camera.permission_status(),
            #[cfg(feature = "clipboard")]
            DetectCamera::Clipboard(camera) => camera.permission_status(),
        }
    }

    async fn request_permission(&mut self) -> AppResult<PermissionStatus> {
        match self {
            DetectCamera::File(camera) => camera.request_permission().await,
            #[cfg(feature = "clipboard")]
            DetectCamera::Clipboard(camera) => camera.request_permission().await,
        }
    }

    async fn capture_still(&mut self) -> AppResult<CapturedImage> {
        match self {
            DetectCamera::File(camera) => camera.capture_still().await,
            #[cfg(feature = "clipboard")]
            DetectCamera::Clipboard(camera) => camera.capture_still().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            DetectCamera::File(camera) => camera.describe(),
            #[cfg(feature = "clipboard")]
            DetectCamera::Clipboard(camera) => camera.describe(),
        }
    }
}

pub fn is_mime_image(mime: &Mime) -> bool {
    mime.type_() == mime::IMAGE
}

/// Base64-encodes a still, downsizing it first when it exceeds `max_dimension`.
pub fn encode_still(data: Vec<u8>, options: &CameraOptions) -> AppResult<String> {
    let data = match options.max_dimension {
        Some(max_dimension) => downsize_still(data, max_dimension)?,
        None => data,
    };
    Ok(BASE64_STANDARD.encode(data))
}

fn downsize_still(data: Vec<u8>, max_dimension: u32) -> AppResult<Vec<u8>> {
    if max_dimension == 0 {
        return Err(AppError::SystemError {
            message: "Maximum image dimension should be more than zero".to_string(),
        });
    }
    let source_format = image::guess_format(&data)?;
    let image = image::load_from_memory_with_format(&data, source_format)?;
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return Ok(data);
    }
    let resized_image = image.resize(
        max_dimension,
        max_dimension,
        image::imageops::FilterType::Triangle,
    );
    debug!(
        "Downsized still from {}x{} to {}x{}",
        image.width(),
        image.height(),
        resized_image.width(),
        resized_image.height()
    );

    let mut output = Cursor::new(Vec::new());
    if source_format.writing_enabled() && source_format != ImageFormat::Jpeg {
        resized_image.write_to(&mut output, source_format)?;
    } else {
        image::DynamicImage::ImageRgb8(resized_image.to_rgb8())
            .write_to(&mut output, ImageFormat::Jpeg)?;
    }
    Ok(output.into_inner())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut output = Cursor::new(Vec::new());
        image
            .write_to(&mut output, ImageFormat::Png)
            .expect("png encoding");
        output.into_inner()
    }

    #[test]
    fn encode_still_without_limit_keeps_bytes() -> AppResult<()> {
        let data = png_bytes(8, 4);
        let encoded = encode_still(data.clone(), &CameraOptions::default())?;
        assert_eq!(BASE64_STANDARD.decode(encoded)?, data);
        Ok(())
    }

    #[test]
    fn encode_still_downsizes_large_images() -> AppResult<()> {
        let encoded = encode_still(
            png_bytes(40, 20),
            &CameraOptions {
                max_dimension: Some(10),
            },
        )?;
        let decoded = image::load_from_memory(&BASE64_STANDARD.decode(encoded)?)?;
        assert_eq!((decoded.width(), decoded.height()), (10, 5));
        Ok(())
    }

    #[test]
    fn encode_still_leaves_small_images_alone() -> AppResult<()> {
        let data = png_bytes(4, 4);
        let encoded = encode_still(
            data.clone(),
            &CameraOptions {
                max_dimension: Some(10),
            },
        )?;
        assert_eq!(BASE64_STANDARD.decode(encoded)?, data);
        Ok(())
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(matches!(
            DetectCamera::open("rtsp://camera.local/stream", CameraOptions::default()),
            Err(AppError::UnknownCaptureSource { .. })
        ));
    }
}
