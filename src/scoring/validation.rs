/// Columns every upload must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 5] = ["driver", "team", "points", "wins", "podiums"];

/// Check a table header against the required columns.
/// Returns every missing column (not just the first), in `required` order.
pub fn validate_schema<S: AsRef<str>>(columns: &[S], required: &[&str]) -> Result<(), Vec<String>> {
    let missing: Vec<String> = required
        .iter()
        .filter(|req| !columns.iter().any(|c| c.as_ref().trim() == **req))
        .map(|req| req.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}
