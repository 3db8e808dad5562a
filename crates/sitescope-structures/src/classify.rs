//! Classification of free-form point-feature tags.
//!
//! Tags come from the geometry source as arbitrary strings. Classification
//! is a total function: every string maps to exactly one
//! [`Classification`]. Anything not known to be a non-tree feature is drawn
//! as a tree so unmodeled content stays visible.

/// Tags known not to be trees.
pub const NON_TREE_TAGS: [&str; 8] = [
    "shrubbery",
    "utilitypole",
    "bench",
    "hydrant",
    "rock",
    "illustration",
    "adcolumn",
    "ac_unit",
];

/// Result of classifying a point-feature tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Tree,
    Shrubbery,
    UtilityPole,
    Bench,
    Default,
}

/// Trims and lower-cases a raw tag.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classifies a raw tag.
pub fn classify(raw: &str) -> Classification {
    let tag = normalize_tag(raw);
    if tag.contains("tree") || !NON_TREE_TAGS.contains(&tag.as_str()) {
        return Classification::Tree;
    }
    match tag.as_str() {
        "utilitypole" => Classification::UtilityPole,
        "shrubbery" => Classification::Shrubbery,
        "bench" => Classification::Bench,
        _ => Classification::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_examples() {
        assert_eq!(classify("Planter_01"), Classification::Tree);
        assert_eq!(classify(" UtilityPole "), Classification::UtilityPole);
        assert_eq!(classify("tree"), Classification::Tree);
        assert_eq!(classify("BENCH"), Classification::Bench);
        assert_eq!(classify("shrubbery\n"), Classification::Shrubbery);
        assert_eq!(classify("hydrant"), Classification::Default);
        assert_eq!(classify("AC_Unit"), Classification::Default);
        assert_eq!(classify(""), Classification::Tree);
        assert_eq!(classify("   "), Classification::Tree);
    }

    #[test]
    fn test_tree_substring_wins() {
        assert_eq!(classify("street_tree"), Classification::Tree);
        assert_eq!(classify("Treeline"), Classification::Tree);
    }

    proptest! {
        #[test]
        fn classification_is_total(tag in ".*") {
            let _ = classify(&tag);
        }

        #[test]
        fn unknown_tags_fall_back_to_tree(tag in "[a-zA-Z0-9_ ]{0,24}") {
            let norm = normalize_tag(&tag);
            prop_assume!(!NON_TREE_TAGS.contains(&norm.as_str()));
            prop_assert_eq!(classify(&tag), Classification::Tree);
        }

        #[test]
        fn known_tags_ignore_case_and_padding(
            idx in 0usize..NON_TREE_TAGS.len(),
            upper in any::<bool>(),
            pad in "[ \t]{0,3}",
        ) {
            let base = NON_TREE_TAGS[idx];
            let tag = if upper { base.to_uppercase() } else { base.to_string() };
            let padded = format!("{pad}{tag}{pad}");
            prop_assert_eq!(classify(&padded), classify(base));
            prop_assert_ne!(classify(&padded), Classification::Tree);
        }
    }
}
