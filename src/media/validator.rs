use crate::error::ValidationError;

use super::asset::ImageAsset;

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Type/size acceptance policy. Pixel content is never inspected.
///
/// Size is checked first: an oversized candidate is `TooLarge` whatever its type.
pub fn validate(candidate: &ImageAsset) -> Result<(), ValidationError> {
    validate_parts(&candidate.mime_type, candidate.size_bytes)
}

pub fn validate_parts(mime_type: &str, size_bytes: u64) -> Result<(), ValidationError> {
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge);
    }
    if !mime_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    Ok(())
}
