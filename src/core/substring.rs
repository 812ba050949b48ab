// Linewright - core/substring.rs
//
// Ordered substring removal and replacement. Pure functions, no I/O.
// Rules run strictly in configuration order; each sees the previous output.

use crate::core::model::Replacement;

/// Remove every occurrence of each cut string, in list order.
///
/// Empty cut strings are ignored.
pub fn remove_cuts(line: &str, cuts: &[String]) -> String {
    let mut out = line.to_string();
    for cut in cuts.iter().filter(|c| !c.is_empty()) {
        if out.contains(cut.as_str()) {
            out = out.replace(cut.as_str(), "");
        }
    }
    out
}

/// Apply each replacement as a global literal substitution, in list order.
///
/// Replacements with an empty `from` are ignored.
pub fn apply_replacements(line: &str, replacements: &[Replacement]) -> String {
    let mut out = line.to_string();
    for r in replacements.iter().filter(|r| !r.from.is_empty()) {
        if out.contains(r.from.as_str()) {
            out = out.replace(r.from.as_str(), &r.to);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cuts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_cut() {
        assert_eq!(remove_cuts("abc", &cuts(&["a"])), "bc");
    }

    #[test]
    fn test_cut_removes_every_occurrence() {
        assert_eq!(remove_cuts("a-b-c", &cuts(&["-"])), "abc");
    }

    #[test]
    fn test_cuts_interact_in_order() {
        // Removing "b" first joins "a" and "c" into a new "ac" match.
        assert_eq!(remove_cuts("abc", &cuts(&["b", "ac"])), "");
        assert_eq!(remove_cuts("abc", &cuts(&["ac", "b"])), "ac");
    }

    #[test]
    fn test_missing_and_empty_cuts_are_noops() {
        assert_eq!(remove_cuts("abc", &cuts(&["z", ""])), "abc");
    }

    #[test]
    fn test_replacements_chain_in_order() {
        let rules = vec![Replacement::new("cat", "dog"), Replacement::new("dog", "fox")];
        assert_eq!(apply_replacements("cat dog", &rules), "fox fox");

        let reversed = vec![Replacement::new("dog", "fox"), Replacement::new("cat", "dog")];
        assert_eq!(apply_replacements("cat dog", &reversed), "dog fox");
    }

    #[test]
    fn test_overlapping_keys_follow_list_order() {
        let rules = vec![Replacement::new("ab", "X"), Replacement::new("abc", "Y")];
        assert_eq!(apply_replacements("abc", &rules), "Xc");

        let rules = vec![Replacement::new("abc", "Y"), Replacement::new("ab", "X")];
        assert_eq!(apply_replacements("abc", &rules), "Y");
    }

    #[test]
    fn test_empty_from_is_ignored() {
        let rules = vec![Replacement::new("", "X")];
        assert_eq!(apply_replacements("abc", &rules), "abc");
    }
}
