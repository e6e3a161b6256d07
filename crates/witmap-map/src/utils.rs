//! Utility functions for header and field-name comparison.

/// Canonical comparison key: lowercase ASCII letters and digits only.
///
/// Spaces, punctuation, underscores and non-ASCII characters are dropped, so
/// `"Area Path"`, `"area_path"` and `"AREA-PATH"` all become `"areapath"`.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}

/// Naive English singular of an already normalized string.
///
/// `"priorities"` → `"priority"`, `"steps"` → `"step"`; anything else is
/// returned unchanged.
pub fn singularize(normalized: &str) -> String {
    if let Some(stem) = normalized.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = normalized.strip_suffix('s') {
        stem.to_string()
    } else {
        normalized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn strips_separators_and_case() {
        assert_eq!(normalize("Test Case Title"), "testcasetitle");
        assert_eq!(normalize("  Area_Path "), "areapath");
        assert_eq!(normalize("Microsoft.VSTS.TCM.Steps"), "microsoftvststcmsteps");
        assert_eq!(normalize("Prio (1-4)"), "prio14");
        assert_eq!(normalize("Résumé"), "rsum");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn singular_forms() {
        assert_eq!(singularize("priorities"), "priority");
        assert_eq!(singularize("steps"), "step");
        assert_eq!(singularize("tag"), "tag");
        assert_eq!(singularize("s"), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in any::<String>()) {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
            prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
