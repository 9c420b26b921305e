use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{error::ImageError, EncodedImage, ImageSource};

const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Reads cover images from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

#[async_trait]
impl ImageSource for FsImageSource {
    async fn load_encoded(&self, path: &Path) -> Result<EncodedImage, ImageError> {
        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
            .unwrap_or(false);
        if !accepted {
            return Err(ImageError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(EncodedImage {
            file_name,
            base64: STANDARD.encode(bytes),
        })
    }
}
