use crate::sbom_generation::domain::License;

/// LicenseMergePolicy encodes when two license entries describe the same
/// license and how a list absorbs a new entry.
///
/// Identity rules:
/// 1. Equal SPDX ids (exact match)
/// 2. An id on one side equal to the name on the other
/// 3. Equal names (case-insensitive)
/// 4. For entries with neither id nor name, equal text
///
/// A matching entry is enriched field by field; the first non-empty value
/// of each field is kept.
pub struct LicenseMergePolicy;

impl LicenseMergePolicy {
    pub fn same_license(a: &License, b: &License) -> bool {
        if a.is_anonymous() && b.is_anonymous() {
            return matches!((a.text(), b.text()), (Some(x), Some(y)) if x.trim() == y.trim());
        }
        if let (Some(x), Some(y)) = (a.id(), b.id()) {
            return x == y;
        }
        let names_match = |x: Option<&str>, y: Option<&str>| match (x, y) {
            (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
            _ => false,
        };
        names_match(a.id(), b.name())
            || names_match(a.name(), b.id())
            || names_match(a.name(), b.name())
    }

    /// Adds `incoming` to `licenses`, merging it into an existing entry for
    /// the same license. Entries with neither id, name nor text are ignored.
    ///
    /// Returns true when the list changed.
    pub fn merge_into(licenses: &mut Vec<License>, incoming: &License) -> bool {
        let incoming = incoming.normalized();
        if incoming.is_anonymous() && incoming.text().is_none() {
            return false;
        }

        if let Some(existing) = licenses
            .iter_mut()
            .find(|existing| Self::same_license(existing, &incoming))
        {
            let before = Self::specificity(existing);
            existing.absorb(&incoming);
            return Self::specificity(existing) > before;
        }

        licenses.push(incoming);
        true
    }

    /// Number of populated fields; more populated means more specific
    pub fn specificity(license: &License) -> usize {
        [
            license.id().is_some(),
            license.name().is_some(),
            license.url().is_some(),
            license.text().is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_license_by_id() {
        assert!(LicenseMergePolicy::same_license(
            &License::spdx("MIT"),
            &License::spdx("MIT")
        ));
        assert!(!LicenseMergePolicy::same_license(
            &License::spdx("MIT"),
            &License::spdx("Apache-2.0")
        ));
    }

    #[test]
    fn test_same_license_id_against_name() {
        assert!(LicenseMergePolicy::same_license(
            &License::spdx("MIT"),
            &License::named("mit")
        ));
    }

    #[test]
    fn test_same_license_distinct_ids_with_equal_names() {
        let a = License::new(
            Some("GPL-2.0-only".to_string()),
            Some("GPL".to_string()),
            None,
            None,
        );
        let b = License::new(
            Some("GPL-3.0-only".to_string()),
            Some("GPL".to_string()),
            None,
            None,
        );
        assert!(!LicenseMergePolicy::same_license(&a, &b));
    }

    #[test]
    fn test_merge_into_does_not_duplicate() {
        let mut licenses = vec![License::spdx("Apache-2.0")];
        assert!(!LicenseMergePolicy::merge_into(
            &mut licenses,
            &License::spdx("Apache-2.0")
        ));
        assert_eq!(licenses.len(), 1);
    }

    #[test]
    fn test_merge_into_named_and_full_text_become_one_richer_entry() {
        let mut licenses = vec![License::named("Eclipse Public License")];
        let with_text = License::named("Eclipse Public License").with_text("THE ACCOMPANYING PROGRAM");

        assert!(LicenseMergePolicy::merge_into(&mut licenses, &with_text));
        assert_eq!(licenses.len(), 1);
        assert_eq!(licenses[0].text(), Some("THE ACCOMPANYING PROGRAM"));
    }

    #[test]
    fn test_merge_into_text_only_licenses() {
        let text_only = |text: &str| License::new(None, None, None, Some(text.to_string()));
        let mut licenses = vec![text_only("Permission is hereby granted")];

        assert!(!LicenseMergePolicy::merge_into(
            &mut licenses,
            &text_only("Permission is hereby granted\n")
        ));
        assert_eq!(licenses.len(), 1);

        assert!(LicenseMergePolicy::merge_into(
            &mut licenses,
            &text_only("Redistribution and use in source")
        ));
        assert_eq!(licenses.len(), 2);
    }

    #[test]
    fn test_merge_into_appends_new_license() {
        let mut licenses = vec![License::spdx("MIT")];
        assert!(LicenseMergePolicy::merge_into(
            &mut licenses,
            &License::spdx("BSD-3-Clause")
        ));
        assert_eq!(licenses.len(), 2);
        assert_eq!(licenses[1].id(), Some("BSD-3-Clause"));
    }

    #[test]
    fn test_merge_into_ignores_empty_entry() {
        let mut licenses = Vec::new();
        assert!(!LicenseMergePolicy::merge_into(
            &mut licenses,
            &License::default()
        ));
        assert!(licenses.is_empty());
    }

    #[test]
    fn test_specificity() {
        assert_eq!(LicenseMergePolicy::specificity(&License::default()), 0);
        assert_eq!(
            LicenseMergePolicy::specificity(
                &License::spdx("MIT").with_url("https://opensource.org/licenses/MIT")
            ),
            2
        );
    }
}
