use std::{borrow::Cow, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const CAPTURE_MIME_TYPE: &str = "image/jpeg";
pub const CAPTURE_FILE_NAME: &str = "camera_capture.jpg";
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";
/// Extensions the classification service lets through.
const UPLOAD_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    File,
    Capture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContent {
    Bytes(Vec<u8>),
    /// `data:<mime>;base64,<payload>` as produced by a webview canvas.
    DataUri(String),
}

/// The staged photo. Replaced wholesale on every accepted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub source_kind: SourceKind,
    pub mime_type: String,
    pub size_bytes: u64,
    pub file_name: String,
    pub content: AssetContent,
}

/// What the webview needs to render the preview header; never the pixels.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub source_kind: SourceKind,
    pub mime_type: String,
    pub size_bytes: u64,
    pub file_name: String,
}

impl ImageAsset {
    pub fn from_bytes(
        source_kind: SourceKind,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            source_kind,
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            file_name: file_name.into(),
            content: AssetContent::Bytes(bytes),
        }
    }

    /// Parses a base64 data URI. The declared MIME type is taken at face value.
    pub fn from_data_uri(
        source_kind: SourceKind,
        file_name: impl Into<String>,
        uri: &str,
    ) -> CoreResult<Self> {
        let (mime_type, payload) = split_data_uri(uri)?;
        let decoded = STANDARD
            .decode(payload)
            .map_err(|err| CoreError::InvalidData(format!("bad base64 payload: {err}")))?;

        Ok(Self {
            source_kind,
            mime_type: mime_type.to_string(),
            size_bytes: decoded.len() as u64,
            file_name: file_name.into(),
            content: AssetContent::DataUri(uri.to_string()),
        })
    }

    pub fn bytes(&self) -> CoreResult<Cow<'_, [u8]>> {
        match &self.content {
            AssetContent::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            AssetContent::DataUri(uri) => {
                let (_, payload) = split_data_uri(uri)?;
                STANDARD
                    .decode(payload)
                    .map(Cow::Owned)
                    .map_err(|err| CoreError::InvalidData(format!("bad base64 payload: {err}")))
            }
        }
    }

    pub fn to_data_uri(&self) -> CoreResult<String> {
        match &self.content {
            AssetContent::DataUri(uri) => Ok(uri.clone()),
            AssetContent::Bytes(bytes) => Ok(format!(
                "data:{};base64,{}",
                self.mime_type,
                STANDARD.encode(bytes)
            )),
        }
    }

    /// File name used for the multipart upload. The service accepts only a
    /// fixed set of extensions, so the name is always `image.<ext>` and falls
    /// back to `jpg` for subtypes outside that set.
    pub fn upload_file_name(&self) -> String {
        let mut extension = extension_for_mime(&self.mime_type);
        if !UPLOAD_EXTENSIONS.contains(&extension) {
            extension = "jpg";
        }
        format!("image.{extension}")
    }

    pub fn summary(&self) -> AssetSummary {
        AssetSummary {
            source_kind: self.source_kind,
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes,
            file_name: self.file_name.clone(),
        }
    }
}

fn split_data_uri(uri: &str) -> CoreResult<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::InvalidData("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::InvalidData("data URI has no payload".into()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default();
    if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
        return Err(CoreError::InvalidData("data URI is not base64 encoded".into()));
    }
    Ok((mime_type, payload))
}

/// MIME type inferred from the file extension, the same signal a browser file
/// input reports.
pub fn mime_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    ImageFormat::from_mime_type(mime_type)
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_size_is_decoded_length() {
        let uri = format!("data:image/jpeg;base64,{}", STANDARD.encode([1u8, 2, 3, 4, 5]));
        let asset = ImageAsset::from_data_uri(SourceKind::Capture, CAPTURE_FILE_NAME, &uri).unwrap();
        assert_eq!(asset.mime_type, "image/jpeg");
        assert_eq!(asset.size_bytes, 5);
        assert_eq!(asset.bytes().unwrap().as_ref(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn rejects_non_base64_data_uri() {
        let err = ImageAsset::from_data_uri(SourceKind::Capture, "x", "data:image/png,raw").unwrap_err();
        assert!(matches!(err, CoreError::InvalidData(_)));
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(Path::new("rash.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("notes.txt")), UNKNOWN_MIME_TYPE);
    }

    #[test]
    fn upload_name_follows_mime_type() {
        let asset = ImageAsset::from_bytes(SourceKind::File, "blob", "image/png", vec![0]);
        assert_eq!(asset.upload_file_name(), "image.png");

        let named = ImageAsset::from_bytes(SourceKind::File, "arm.jpeg", "image/jpeg", vec![0]);
        assert_eq!(named.upload_file_name(), "image.jpg");

        let webp = ImageAsset::from_bytes(SourceKind::File, "x.webp", "image/webp", vec![0]);
        assert_eq!(webp.upload_file_name(), "image.webp");
    }

    #[test]
    fn unsupported_subtype_uploads_as_jpg() {
        for (name, mime) in [
            ("scan.tiff", "image/tiff"),
            ("photo.avif", "image/avif"),
            ("icon.ico", "image/x-icon"),
            ("mystery", "image/heic"),
        ] {
            let asset = ImageAsset::from_bytes(SourceKind::File, name, mime, vec![0]);
            assert_eq!(asset.upload_file_name(), "image.jpg", "{mime}");
        }
    }

    #[test]
    fn bytes_round_trip_through_preview_uri() {
        let asset = ImageAsset::from_bytes(SourceKind::File, "a.png", "image/png", vec![9, 8, 7]);
        let uri = asset.to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
