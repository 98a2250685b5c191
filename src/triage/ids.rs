const CASE_PREFIX: &str = "case_";
const VERIFICATION_PREFIX: &str = "ver_";

/// Lower-case the charger id and collapse every run of non-alphanumeric characters into a
/// single underscore, trimming underscores at the edges.
fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

pub fn make_case_id(charger_id: &str) -> String {
    let slug = slugify(charger_id);
    if slug.is_empty() {
        return format!("{CASE_PREFIX}unknown");
    }
    format!("{CASE_PREFIX}{slug}")
}

pub fn make_verification_task_id(case_id: &str) -> String {
    let suffix = case_id.strip_prefix(CASE_PREFIX).unwrap_or(case_id);
    format!("{VERIFICATION_PREFIX}{suffix}")
}
