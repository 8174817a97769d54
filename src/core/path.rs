//! Breadcrumb path normalization.
//!
//! Pure string helpers: browse paths travel the wire as strings with `/`
//! separators, so the normalizer works on strings rather than OS paths.

use super::error::ExplorerError;

/// Splits `path` into its ordered, non-empty segments after the `root`
/// prefix.
///
/// `path == root` yields an empty list (the breadcrumb renders just "Root").
/// A path that is not under the root fails with
/// [`ExplorerError::NotUnderRoot`] rather than guessing a truncation.
/// Trailing separators on either input are irrelevant.
pub fn relative_segments(path: &str, root: &str) -> Result<Vec<String>, ExplorerError> {
    let trimmed_root = root.trim_end_matches('/');

    let not_under_root = || ExplorerError::NotUnderRoot {
        path: path.to_string(),
        root: root.to_string(),
    };

    let rest = path.strip_prefix(trimmed_root).ok_or_else(not_under_root)?;
    // "/data/apple" must not pass as being under "/data/app".
    if !rest.is_empty() && !rest.starts_with('/') {
        return Err(not_under_root());
    }

    Ok(rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rebuilds the absolute path for the breadcrumb prefix of length `count`.
///
/// The exact left inverse of [`relative_segments`]: joining the root with the
/// first `count` segments reproduces the path that produced them. `count` of
/// zero returns the root as given.
pub fn path_for_prefix(root: &str, segments: &[String], count: usize) -> String {
    let take = count.min(segments.len());
    if take == 0 {
        return root.to_string();
    }

    let mut path = root.trim_end_matches('/').to_string();
    for segment in &segments[..take] {
        path.push('/');
        path.push_str(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn path_equal_to_root_has_no_segments() {
        assert!(relative_segments("/data/app", "/data/app").unwrap().is_empty());
        assert!(relative_segments("/data/app", "/data/app/").unwrap().is_empty());
    }

    #[test]
    fn splits_nested_path_into_segments() {
        let segments = relative_segments("/data/app/photos/2024", "/data/app").unwrap();
        assert_eq!(segments, vec!["photos", "2024"]);
    }

    #[test]
    fn tolerates_trailing_separators() {
        let segments = relative_segments("/data/app/photos/", "/data/app/").unwrap();
        assert_eq!(segments, vec!["photos"]);
    }

    #[test]
    fn rejects_path_outside_root() {
        let result = relative_segments("/var/log", "/data/app");
        assert!(matches!(result, Err(ExplorerError::NotUnderRoot { .. })));
    }

    #[test]
    fn rejects_sibling_with_shared_name_prefix() {
        let result = relative_segments("/data/apple/pie", "/data/app");
        assert!(matches!(result, Err(ExplorerError::NotUnderRoot { .. })));
    }

    #[test]
    fn prefix_zero_is_the_root_as_given() {
        let segments = vec!["photos".to_string(), "2024".to_string()];
        assert_eq!(path_for_prefix("/data/app/", &segments, 0), "/data/app/");
    }

    #[test]
    fn breadcrumb_click_rebuilds_intermediate_path() {
        let segments = relative_segments("/data/app/photos/2024", "/data/app").unwrap();
        // Clicking the first breadcrumb segment navigates one level deep.
        assert_eq!(path_for_prefix("/data/app", &segments, 1), "/data/app/photos");
        assert_eq!(
            path_for_prefix("/data/app", &segments, 2),
            "/data/app/photos/2024"
        );
    }

    #[test]
    fn prefix_count_is_clamped_to_segment_count() {
        let segments = vec!["photos".to_string()];
        assert_eq!(path_for_prefix("/data/app", &segments, 9), "/data/app/photos");
    }

    proptest! {
        #[test]
        fn split_then_rebuild_is_identity(
            segments in proptest::collection::vec("[a-zA-Z0-9._-]{1,12}", 0..6),
            count in 0usize..8,
        ) {
            let root = "/data/app";
            let path = path_for_prefix(root, &segments, segments.len());
            let split = relative_segments(&path, root).unwrap();
            prop_assert_eq!(&split, &segments);

            let take = count.min(segments.len());
            prop_assert_eq!(
                path_for_prefix(root, &split, count),
                path_for_prefix(root, &segments[..take].to_vec(), take)
            );
        }
    }
}
