//! Output Path Helpers
//!
//! Maps a branch name and an optional user-supplied output location to the
//! file the rendered review is written to.

use std::path::Path;

/// Replace filesystem-hostile characters in a branch name with `_`.
/// Alphanumerics, `-`, `_` and `.` pass through unchanged.
pub fn sanitize_branch_name(branch: &str) -> String {
    branch
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Determine the output file for a review.
///
/// - `None`: the default filename in the current directory
/// - an existing directory: the default filename inside it
/// - anything else: used as-is
pub fn determine_output_file(output: Option<&str>, branch: &str, json: bool) -> String {
    let extension = if json { "json" } else { "md" };
    let default_name = format!("review_{}.{}", sanitize_branch_name(branch), extension);

    match output {
        None => default_name,
        Some(path) if Path::new(path).is_dir() => Path::new(path)
            .join(default_name)
            .to_string_lossy()
            .into_owned(),
        Some(path) => path.to_string(),
    }
}
