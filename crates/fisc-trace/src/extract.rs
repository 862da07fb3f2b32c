//! Subtree extraction from indentation-encoded computation trees.

/// Depth of a line: the count of its leading whitespace characters.
#[must_use]
pub fn indent_depth(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Whether a line names the target variable.
///
/// Anchored word-boundary prefix match: after leading whitespace the line must start
/// with the exact variable token, followed by end-of-line, whitespace, or the opening
/// `<` of a bracketed annotation. `income` therefore matches neither `incomes` nor
/// `income_tax`.
fn matches_target(line: &str, variable: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix(variable) else {
        return false;
    };
    match rest.chars().next() {
        None => true,
        Some(c) => c == '<' || c.is_whitespace(),
    }
}

/// Extract the contiguous subtree rooted at the first occurrence of `variable`.
///
/// Linear scan: the first matching line starts capture at its depth; every subsequent
/// line with greater depth is a dependency and is captured; the first line at the same
/// or lesser depth ends the extraction. Only the first occurrence's block is ever
/// returned, even if the variable recurs later in the tree.
///
/// Returns an empty vector when the variable does not appear (not an error).
#[must_use]
pub fn extract(lines: &[String], variable: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut target_depth = 0;
    let mut capturing = false;

    for line in lines {
        let depth = indent_depth(line);
        if capturing {
            if depth <= target_depth {
                break;
            }
            result.push(line.clone());
        } else if matches_target(line, variable) {
            target_depth = depth;
            capturing = true;
            result.push(line.clone());
        }
    }

    result
}
