//! List key validation.
//!
//! A key doubles as a file stem on disk, so it must survive a round trip
//! through `<key>.<ext>` on every platform the store runs on.

use crate::error::CoreError;

/// Maximum length of a list key, in characters.
pub const MAX_KEY_LEN: usize = 64;

/// Characters that are never valid in a key.
const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Validate a candidate list key.
///
/// Rules, checked in order:
/// 1. Non-empty
/// 2. At most [`MAX_KEY_LEN`] characters
/// 3. No whitespace, control characters or path/shell metacharacters
/// 4. Does not start or end with `.`
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    // 1. Empty
    if key.is_empty() {
        return Err(CoreError::EmptyKey);
    }

    // 2. Length
    let len = key.chars().count();
    if len > MAX_KEY_LEN {
        return Err(CoreError::KeyTooLong {
            len,
            max: MAX_KEY_LEN,
        });
    }

    // 3. Character set
    if let Some(ch) = key
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN.contains(c))
    {
        return Err(CoreError::ForbiddenCharacter { ch });
    }

    // 4. Hidden files and stems that collapse a trailing dot
    if key.starts_with('.') || key.ends_with('.') {
        return Err(CoreError::DotBoundary);
    }

    Ok(())
}
