// Linewright - core/affix.rs
//
// Prefix/suffix stripping and adding. Pure functions, no I/O.

/// Remove `prefix` from the start and `suffix` from the end of `line`.
///
/// Exact match only. An affix that is absent (or empty) leaves the line
/// unchanged; this is not an error.
pub fn strip_affixes<'a>(line: &'a str, prefix: &str, suffix: &str) -> &'a str {
    let line = line.strip_prefix(prefix).unwrap_or(line);
    line.strip_suffix(suffix).unwrap_or(line)
}

/// Concatenate `prefix`, `line` and `suffix`.
pub fn add_affixes(line: &str, prefix: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + line.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(line);
    out.push_str(suffix);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_present_affixes() {
        assert_eq!(strip_affixes("// note;", "// ", ";"), "note");
    }

    #[test]
    fn test_strip_absent_affix_is_noop() {
        assert_eq!(strip_affixes("note;", "// ", ""), "note;");
        assert_eq!(strip_affixes("note", "", ";"), "note");
    }

    #[test]
    fn test_strip_only_once() {
        assert_eq!(strip_affixes("xxabcxx", "x", "x"), "xabcx");
    }

    #[test]
    fn test_strip_when_affixes_overlap_whole_line() {
        // Prefix consumes the line, suffix then has nothing to match.
        assert_eq!(strip_affixes("ab", "ab", "b"), "");
    }

    #[test]
    fn test_add_is_unconditional() {
        assert_eq!(add_affixes("x", "[", "]"), "[x]");
        assert_eq!(add_affixes("", "[", "]"), "[]");
        assert_eq!(add_affixes("[x]", "[", "]"), "[[x]]");
    }
}
