//! Style-keyword allowlist.
//!
//! A small set of form/tone descriptors that are meaningful for scoring.
//! Raw `keywords` columns carry hundreds of plot tokens ("based on novel",
//! "new york city") that say little about whether two films feel alike;
//! only allowlisted tokens participate in the style-overlap feature.
//! The list is compiled in rather than loaded from the database so scoring
//! inputs stay hermetic and reviewable.

use std::collections::BTreeSet;

/// Allowlisted style keywords, lowercase, sorted.
pub const STYLE_KEYWORDS: &[&str] = &[
    "anthology",
    "black comedy",
    "body horror",
    "coming of age",
    "courtroom drama",
    "dark fantasy",
    "dystopia",
    "ensemble cast",
    "epistolary",
    "found footage",
    "hand drawn animation",
    "heist",
    "mind-bending",
    "mockumentary",
    "neo-noir",
    "nonlinear timeline",
    "one location",
    "parody",
    "psychological thriller",
    "real time",
    "revenge",
    "road movie",
    "slasher",
    "slow burn",
    "space opera",
    "stop motion",
    "surrealism",
    "time loop",
    "twist ending",
    "unreliable narrator",
    "whodunit",
];

/// Check whether a (lowercased) keyword is on the style allowlist.
pub fn is_style_keyword(keyword: &str) -> bool {
    STYLE_KEYWORDS.binary_search(&keyword).is_ok()
}

/// Filter a parsed keyword set down to its allowlisted style members.
pub fn style_subset(keywords: &BTreeSet<String>) -> BTreeSet<String> {
    keywords
        .iter()
        .filter(|k| is_style_keyword(k))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist_is_sorted_for_binary_search() {
        let mut sorted = STYLE_KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STYLE_KEYWORDS);
    }

    #[test]
    fn recognizes_allowlisted_keywords() {
        assert!(is_style_keyword("neo-noir"));
        assert!(is_style_keyword("whodunit"));
        assert!(is_style_keyword("time loop"));
    }

    #[test]
    fn rejects_plot_keywords() {
        assert!(!is_style_keyword("based on novel"));
        assert!(!is_style_keyword("new york city"));
        assert!(!is_style_keyword(""));
    }

    #[test]
    fn style_subset_keeps_only_allowlisted() {
        let keywords: BTreeSet<String> = ["neo-noir", "robbery", "twist ending"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let style = style_subset(&keywords);
        assert_eq!(style.len(), 2);
        assert!(style.contains("neo-noir"));
        assert!(style.contains("twist ending"));
    }
}
