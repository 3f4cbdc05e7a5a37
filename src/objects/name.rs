//! Class name validation and utilities
//!
//! Registered class names are qualified identifiers:
//! - Segments separated by `.` (e.g., `zoo.mammals.Dog`)
//! - Each segment: `[A-Za-z_][A-Za-z0-9_]*`
//! - Max 255 characters total
//! - Case is preserved

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Maximum length of a qualified class name
pub const MAX_NAME_LEN: usize = 255;

/// Validation errors for class names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    /// Name is empty
    Empty,
    /// Name is too long (> 255 chars)
    TooLong,
    /// Name contains an empty segment (leading, trailing or doubled dot)
    EmptySegment,
    /// Segment contains invalid characters
    InvalidSegment(String),
    /// Segment starts with a digit
    SegmentStartsWithDigit(String),
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameValidationError::Empty => write!(f, "class name cannot be empty"),
            NameValidationError::TooLong => {
                write!(f, "class name must be {} characters or less", MAX_NAME_LEN)
            }
            NameValidationError::EmptySegment => {
                write!(f, "class name cannot contain empty segments")
            }
            NameValidationError::InvalidSegment(seg) => write!(
                f,
                "segment '{}' contains invalid characters (allowed: letters, digits, underscores)",
                seg
            ),
            NameValidationError::SegmentStartsWithDigit(seg) => {
                write!(f, "segment '{}' must not start with a digit", seg)
            }
        }
    }
}

impl std::error::Error for NameValidationError {}

static SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validate a qualified class name.
///
/// # Examples
/// ```
/// use ookit::objects::validate_class_name;
///
/// assert!(validate_class_name("Animal").is_ok());
/// assert!(validate_class_name("zoo.mammals.Dog").is_ok());
///
/// assert!(validate_class_name("").is_err());
/// assert!(validate_class_name("zoo..Dog").is_err());  // Empty segment
/// assert!(validate_class_name("9Lives").is_err());    // Starts with digit
/// ```
pub fn validate_class_name(name: &str) -> Result<String, NameValidationError> {
    if name.is_empty() {
        return Err(NameValidationError::Empty);
    }

    if name.len() > MAX_NAME_LEN {
        return Err(NameValidationError::TooLong);
    }

    let segments: Vec<&str> = name.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(NameValidationError::EmptySegment);
    }

    for segment in segments {
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(NameValidationError::SegmentStartsWithDigit(
                segment.to_string(),
            ));
        }

        if !SEGMENT_REGEX.is_match(segment) {
            return Err(NameValidationError::InvalidSegment(segment.to_string()));
        }
    }

    Ok(name.to_string())
}

/// Extract the namespace from a qualified class name.
///
/// # Examples
/// ```
/// use ookit::objects::namespace_of;
///
/// assert_eq!(namespace_of("zoo.mammals.Dog"), Some("zoo.mammals".to_string()));
/// assert_eq!(namespace_of("Dog"), None);
/// ```
pub fn namespace_of(name: &str) -> Option<String> {
    name.rfind('.').map(|dot| name[..dot].to_string())
}

/// Extract the final segment of a qualified class name.
///
/// # Examples
/// ```
/// use ookit::objects::short_name;
///
/// assert_eq!(short_name("zoo.mammals.Dog"), "Dog");
/// assert_eq!(short_name("Dog"), "Dog");
/// ```
pub fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
