/// Separator between a category and its function tags or co-index.
pub const TAG_SEPARATOR: char = '-';

/// Strip function tags and co-indices: `NP-SBJ-1` becomes `NP`. Labels that
/// start with the separator (`-NONE-`, `-LRB-`) are null elements or
/// bracket tokens and are kept whole.
pub fn normalize(label: &str) -> &str {
    match label.find(TAG_SEPARATOR) {
        Some(0) | None => label,
        Some(pos) => &label[..pos],
    }
}
