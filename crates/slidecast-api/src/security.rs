//! Input sanitization for values that reach the filesystem.

/// Maximum length of a stored upload filename.
pub const MAX_FILENAME_LENGTH: usize = 200;

/// Reduce a client-supplied filename to a safe basename.
///
/// Path components are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. Leading dots are stripped so the result is never hidden or `..`.
/// Returns `"upload"` when nothing usable remains.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    let truncated = truncate_keeping_extension(cleaned, MAX_FILENAME_LENGTH);

    if truncated.is_empty() {
        "upload".to_string()
    } else {
        truncated
    }
}

/// Longest extension kept intact when a name is shortened.
const MAX_EXTENSION_LENGTH: usize = 16;

/// Shorten an ASCII name to `max` bytes, cutting the stem before the extension.
fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }

    let extension = name
        .rfind('.')
        .filter(|&i| i > 0 && name.len() - i <= MAX_EXTENSION_LENGTH)
        .map(|i| &name[i..])
        .unwrap_or("");

    let stem = &name[..name.len() - extension.len()];
    format!("{}{}", &stem[..max - extension.len()], extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("lecture.mp4"), "lecture.mp4");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\videos\\talk one.mov"), "talk_one.mov");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".hidden.mp4"), "hidden.mp4");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = format!("{}.mp4", "a".repeat(500));
        let name = sanitize_filename(&long);
        assert_eq!(name.len(), MAX_FILENAME_LENGTH);
        assert!(name.ends_with("a.mp4"));

        let no_extension = "b".repeat(300);
        assert_eq!(sanitize_filename(&no_extension), "b".repeat(MAX_FILENAME_LENGTH));

        let odd_suffix = format!("clip.{}", "c".repeat(300));
        assert_eq!(sanitize_filename(&odd_suffix).len(), MAX_FILENAME_LENGTH);
        assert!(sanitize_filename(&odd_suffix).starts_with("clip."));
    }
}
