//! Table and column name normalization.

use crate::error::{IngestError, Result};

/// Names must stay strictly below this many bytes, before and after
/// normalization.
pub const MAX_NAME_LEN: usize = 100;

/// Normalize a free-form name into a wire-safe identifier.
///
/// Surrounding whitespace is trimmed, then the name is converted to lower
/// `snake_case`:
///
/// - a lower-case letter or digit followed by an upper-case letter starts a
///   new word (`DiskUsage` becomes `disk_usage`),
/// - an upper-case run followed by a lower-case letter splits before the last
///   capital (`HTTPServer` becomes `http_server`),
/// - every run of non-alphanumeric characters collapses into one `_` and is
///   dropped at both ends.
///
/// # Errors
///
/// [`IngestError::EmptyName`] when nothing alphanumeric remains and
/// [`IngestError::NameTooLong`] when the trimmed input or the normalized
/// output reaches [`MAX_NAME_LEN`] bytes.
pub fn sanitize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IngestError::EmptyName);
    }
    check_len(trimmed)?;

    let out = snake_case(trimmed);
    if out.is_empty() {
        return Err(IngestError::EmptyName);
    }
    check_len(&out)?;
    Ok(out)
}

fn check_len(s: &str) -> Result<()> {
    if s.len() >= MAX_NAME_LEN {
        return Err(IngestError::NameTooLong {
            name: s.to_string(),
            len: s.len(),
            limit: MAX_NAME_LEN,
        });
    }
    Ok(())
}

fn snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_numeric()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        // Lower-casing may yield combining marks (`İ`) or caseless capitals
        // (`ℋ`); neither survives, so a second pass sees the same words.
        current.extend(
            c.to_lowercase()
                .filter(|l| l.is_alphanumeric() && !l.is_uppercase()),
        );
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ts ", "ts")]
    #[case(" Ts", "ts")]
    #[case(" TS ", "ts")]
    #[case("DiskUsage ", "disk_usage")]
    #[case("Disk-Usage", "disk_usage")]
    #[case("disk usage", "disk_usage")]
    #[case("HTTPServer", "http_server")]
    #[case("cpu2Usage", "cpu2_usage")]
    #[case("already_snake", "already_snake")]
    #[case("  __Leading.Trailing__ ", "leading_trailing")]
    #[case("ID", "id")]
    #[case("İd", "id")]
    #[case("ÄpfelBaum", "äpfel_baum")]
    fn sanitizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_name(input).unwrap(), expected);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(sanitize_name(""), Err(IngestError::EmptyName)));
        assert!(matches!(sanitize_name("   "), Err(IngestError::EmptyName)));
        assert!(matches!(sanitize_name(" -- "), Err(IngestError::EmptyName)));
    }

    #[test]
    fn long_name_is_rejected() {
        let err = sanitize_name(&"timestamp".repeat(20)).unwrap_err();
        assert!(matches!(err, IngestError::NameTooLong { limit: 100, .. }));

        assert!(sanitize_name(&"a".repeat(99)).is_ok());
        assert!(sanitize_name(&"a".repeat(100)).is_err());
    }

    #[test]
    fn expansion_past_limit_is_rejected() {
        // 66 input bytes become 99 output bytes with inserted underscores
        assert!(sanitize_name(&"aB".repeat(33)).is_ok());
        // 90 input bytes grow past the limit
        assert!(sanitize_name(&"aB".repeat(45)).is_err());
    }

    #[test]
    fn lowercasing_never_leaves_separators_behind() {
        let once = sanitize_name("İd").unwrap();
        assert_eq!(once, "id");
        assert_eq!(sanitize_name(&once).unwrap(), once);

        let once = sanitize_name("Aℋb").unwrap();
        assert_eq!(sanitize_name(&once).unwrap(), once);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sanitize_is_idempotent(raw in "[A-Za-z0-9 _.-]{1,99}") {
                if let Ok(once) = sanitize_name(&raw) {
                    let twice = sanitize_name(&once).unwrap();
                    prop_assert_eq!(once, twice);
                }
            }

            #[test]
            fn sanitize_is_idempotent_for_unicode(raw in "[\\p{L}\\p{N}\\p{M} _.-]{1,40}") {
                if let Ok(once) = sanitize_name(&raw) {
                    let twice = sanitize_name(&once).unwrap();
                    prop_assert_eq!(once, twice);
                }
            }

            #[test]
            fn output_is_lower_snake(raw in "[A-Za-z][A-Za-z0-9 -]{0,40}") {
                let out = sanitize_name(&raw).unwrap();
                prop_assert!(!out.starts_with('_') && !out.ends_with('_'));
                prop_assert!(!out.contains("__"));
                prop_assert!(out.chars().all(|c| c == '_' || c.is_ascii_lowercase() || c.is_ascii_digit()));
            }
        }
    }
}
