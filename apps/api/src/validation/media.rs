//! Profile picture upload checks for the settings screen.

use serde::{Deserialize, Serialize};

pub const MAX_PROFILE_PICTURE_BYTES: u64 = 2 * 1024 * 1024;

const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePicture {
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfilePictureCheck {
    pub valid: bool,
    pub error: Option<String>,
}

pub fn is_valid_image_type(content_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(content_type.trim()))
}

pub fn is_valid_file_size(size_bytes: u64) -> bool {
    size_bytes <= MAX_PROFILE_PICTURE_BYTES
}

/// Type is checked before size.
pub fn check_profile_picture(picture: &ProfilePicture) -> ProfilePictureCheck {
    let error = if !is_valid_image_type(&picture.content_type) {
        Some("Only .jpg, .png, or .gif files are allowed".to_string())
    } else if !is_valid_file_size(picture.size_bytes) {
        Some("File size must be less than 2MB".to_string())
    } else {
        None
    };

    ProfilePictureCheck {
        valid: error.is_none(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(content_type: &str, size_bytes: u64) -> ProfilePicture {
        ProfilePicture {
            content_type: content_type.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_accepts_common_images() {
        for t in ["image/jpeg", "image/jpg", "image/png", "image/gif", "IMAGE/PNG"] {
            assert!(is_valid_image_type(t), "{t}");
        }
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(!is_valid_image_type("image/webp"));
        assert!(!is_valid_image_type("application/pdf"));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(is_valid_file_size(MAX_PROFILE_PICTURE_BYTES));
        assert!(!is_valid_file_size(MAX_PROFILE_PICTURE_BYTES + 1));
    }

    #[test]
    fn test_type_error_reported_before_size() {
        let check = check_profile_picture(&picture("image/bmp", MAX_PROFILE_PICTURE_BYTES * 4));
        assert!(!check.valid);
        assert_eq!(
            check.error.as_deref(),
            Some("Only .jpg, .png, or .gif files are allowed")
        );
    }

    #[test]
    fn test_oversized_png() {
        let check = check_profile_picture(&picture("image/png", 3 * 1024 * 1024));
        assert_eq!(check.error.as_deref(), Some("File size must be less than 2MB"));
    }

    #[test]
    fn test_valid_picture() {
        let check = check_profile_picture(&picture("image/gif", 1024));
        assert_eq!(
            check,
            ProfilePictureCheck {
                valid: true,
                error: None
            }
        );
    }
}
