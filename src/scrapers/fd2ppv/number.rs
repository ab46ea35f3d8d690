//! FC2 identifier normalization.

/// Prefixes removed, in order, after uppercasing.
const STRIP_PREFIXES: [&str; 3] = ["FC2PPV", "FC2-PPV-", "FC2-"];

/// Reduce an FC2 code to its bare digits: `fc2-ppv-4347402` -> `4347402`.
pub fn normalize_number(number: &str) -> String {
    let mut number = number.to_uppercase();
    for prefix in STRIP_PREFIXES {
        number = number.replace(prefix, "");
    }
    number.replace('-', "").trim().to_string()
}

/// Identifier as it appears in the output record.
pub fn display_number(normalized: &str) -> String {
    format!("FC2-{}", normalized)
}
