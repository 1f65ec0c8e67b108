//! Rendering "what would change" for preview runs

use similar::TextDiff;

/// Unified diff of a target's old and new content.
pub fn unified_diff(target: &str, old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", target), &format!("b/{}", target))
        .to_string()
}
