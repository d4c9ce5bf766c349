//! Compile-time provenance stamped into every run manifest.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Crate version, commit and build time as a single line.
pub fn version_line() -> String {
    format!(
        "{} {} ({} built {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_TIMESTAMP
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_is_short_hash_or_unknown() {
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        // YYYY-MM-DDTHH:MM:SSZ
        assert_eq!(BUILD_TIMESTAMP.len(), 20);
        assert!(BUILD_TIMESTAMP.ends_with('Z'));
    }

    #[test]
    fn test_version_line_mentions_package() {
        let line = version_line();
        assert!(line.starts_with("encounter-forge "));
        assert!(line.contains(BUILD_COMMIT));
    }
}
