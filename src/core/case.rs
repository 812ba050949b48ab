// Linewright - core/case.rs
//
// Case-style rewriting. Pure functions, no I/O.
//
// Eleven of the fourteen styles are one pre-pass plus the compound-word
// rewrite, parameterised by a row in `compound_rule`. `title` and `reverse`
// have direct implementations; `none` yields an empty string.

use crate::core::model::{CaseSelection, CaseStyle};
use std::borrow::Cow;

/// Whole-string casing applied before the compound rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrePass {
    Keep,
    Lower,
    Upper,
}

/// Parameters of the compound-word rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CompoundRule {
    pre: PrePass,
    separator: &'static str,
    first_lowered: bool,
    title_words: bool,
}

const fn rule(
    pre: PrePass,
    separator: &'static str,
    first_lowered: bool,
    title_words: bool,
) -> CompoundRule {
    CompoundRule {
        pre,
        separator,
        first_lowered,
        title_words,
    }
}

/// Lookup table for every style built on the compound rewrite.
fn compound_rule(style: CaseStyle) -> Option<CompoundRule> {
    use PrePass::{Keep, Lower, Upper};
    let r = match style {
        CaseStyle::Camel => rule(Keep, "", true, true),
        CaseStyle::Pascal => rule(Keep, "", false, true),
        CaseStyle::Snake => rule(Lower, "_", true, false),
        CaseStyle::SnakeAllCaps => rule(Upper, "_", true, false),
        CaseStyle::Kebab => rule(Lower, "-", true, false),
        CaseStyle::SnakeCamel => rule(Lower, "_", true, true),
        CaseStyle::SnakePascal => rule(Lower, "_", false, true),
        CaseStyle::KebabCamel => rule(Lower, "-", true, true),
        CaseStyle::KebabPascal => rule(Lower, "-", false, true),
        CaseStyle::None
        | CaseStyle::Upper
        | CaseStyle::Lower
        | CaseStyle::Title
        | CaseStyle::Reverse => return None,
    };
    Some(r)
}

/// Apply `style` to `input`.
pub fn transform(style: CaseStyle, input: &str) -> String {
    if let Some(r) = compound_rule(style) {
        let pre = match r.pre {
            PrePass::Keep => Cow::Borrowed(input),
            PrePass::Lower => Cow::Owned(input.to_lowercase()),
            PrePass::Upper => Cow::Owned(input.to_uppercase()),
        };
        return compound(&pre, r.separator, r.first_lowered, r.title_words);
    }

    match style {
        CaseStyle::None => String::new(),
        CaseStyle::Upper => input.to_uppercase(),
        CaseStyle::Lower => input.to_lowercase(),
        CaseStyle::Title => title_case(input),
        CaseStyle::Reverse => fold(input),
        // Compound styles returned above.
        _ => input.to_string(),
    }
}

/// Apply the style named `name`. Unknown names return the input unchanged.
pub fn transform_named(name: &str, input: &str) -> String {
    match name.parse::<CaseStyle>() {
        Ok(style) => transform(style, input),
        Err(_) => input.to_string(),
    }
}

impl CaseSelection {
    /// Apply this selection to one line.
    pub fn apply(&self, input: &str) -> String {
        match self {
            CaseSelection::Known(style) => transform(*style, input),
            CaseSelection::Unrecognized(_) => input.to_string(),
        }
    }
}

/// Compound-word rewrite.
///
/// Optionally title-cases the input, lower-cases the first character when
/// `first_lowered`, then replaces every space after the first character with
/// `separator`. U+0020 is the only word boundary.
pub fn compound(input: &str, separator: &str, first_lowered: bool, title_words: bool) -> String {
    let text = if title_words {
        Cow::Owned(title_case(input))
    } else {
        Cow::Borrowed(input)
    };

    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    if first_lowered {
        out.extend(first.to_lowercase());
    } else {
        out.push(first);
    }
    out.push_str(&chars.as_str().replace(' ', separator));
    out
}

/// Upper-case the leading letter of every space-delimited word.
///
/// Uses the full upper-case mapping, not Unicode title case, so a leading
/// `ß` becomes `SS` and `ǆ` becomes `Ǆ`. The rest of each word is left as
/// it is, so already-capitalised text keeps its interior capitals.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c == ' ';
    }
    out
}

/// Replace every character with its simple case-fold successor.
pub fn fold(input: &str) -> String {
    input.chars().map(simple_fold).collect()
}

// =============================================================================
// Simple case folding
// =============================================================================

/// Orbits with more than two members (or self-mapping entries). Each pair maps
/// a character to the next one in its orbit; sorted by the first element.
const CASE_ORBIT: &[(char, char)] = &[
    ('\u{004B}', '\u{006B}'),
    ('\u{0053}', '\u{0073}'),
    ('\u{006B}', '\u{212A}'),
    ('\u{0073}', '\u{017F}'),
    ('\u{00B5}', '\u{039C}'),
    ('\u{00C5}', '\u{00E5}'),
    ('\u{00DF}', '\u{1E9E}'),
    ('\u{00E5}', '\u{212B}'),
    ('\u{0130}', '\u{0130}'),
    ('\u{0131}', '\u{0131}'),
    ('\u{017F}', '\u{0053}'),
    ('\u{01C4}', '\u{01C5}'),
    ('\u{01C5}', '\u{01C6}'),
    ('\u{01C6}', '\u{01C4}'),
    ('\u{01C7}', '\u{01C8}'),
    ('\u{01C8}', '\u{01C9}'),
    ('\u{01C9}', '\u{01C7}'),
    ('\u{01CA}', '\u{01CB}'),
    ('\u{01CB}', '\u{01CC}'),
    ('\u{01CC}', '\u{01CA}'),
    ('\u{01F1}', '\u{01F2}'),
    ('\u{01F2}', '\u{01F3}'),
    ('\u{01F3}', '\u{01F1}'),
    ('\u{0345}', '\u{0399}'),
    ('\u{0392}', '\u{03B2}'),
    ('\u{0395}', '\u{03B5}'),
    ('\u{0398}', '\u{03B8}'),
    ('\u{0399}', '\u{03B9}'),
    ('\u{039A}', '\u{03BA}'),
    ('\u{039C}', '\u{03BC}'),
    ('\u{03A0}', '\u{03C0}'),
    ('\u{03A1}', '\u{03C1}'),
    ('\u{03A3}', '\u{03C2}'),
    ('\u{03A6}', '\u{03C6}'),
    ('\u{03A9}', '\u{03C9}'),
    ('\u{03B2}', '\u{03D0}'),
    ('\u{03B5}', '\u{03F5}'),
    ('\u{03B8}', '\u{03D1}'),
    ('\u{03B9}', '\u{1FBE}'),
    ('\u{03BA}', '\u{03F0}'),
    ('\u{03BC}', '\u{00B5}'),
    ('\u{03C0}', '\u{03D6}'),
    ('\u{03C1}', '\u{03F1}'),
    ('\u{03C2}', '\u{03C3}'),
    ('\u{03C3}', '\u{03A3}'),
    ('\u{03C6}', '\u{03D5}'),
    ('\u{03C9}', '\u{2126}'),
    ('\u{03D0}', '\u{0392}'),
    ('\u{03D1}', '\u{03F4}'),
    ('\u{03D5}', '\u{03A6}'),
    ('\u{03D6}', '\u{03A0}'),
    ('\u{03F0}', '\u{039A}'),
    ('\u{03F1}', '\u{03A1}'),
    ('\u{03F4}', '\u{0398}'),
    ('\u{03F5}', '\u{0395}'),
    ('\u{0412}', '\u{0432}'),
    ('\u{0414}', '\u{0434}'),
    ('\u{041E}', '\u{043E}'),
    ('\u{0421}', '\u{0441}'),
    ('\u{0422}', '\u{0442}'),
    ('\u{042A}', '\u{044A}'),
    ('\u{0432}', '\u{1C80}'),
    ('\u{0434}', '\u{1C81}'),
    ('\u{043E}', '\u{1C82}'),
    ('\u{0441}', '\u{1C83}'),
    ('\u{0442}', '\u{1C84}'),
    ('\u{044A}', '\u{1C86}'),
    ('\u{0462}', '\u{0463}'),
    ('\u{0463}', '\u{1C87}'),
    ('\u{1C80}', '\u{0412}'),
    ('\u{1C81}', '\u{0414}'),
    ('\u{1C82}', '\u{041E}'),
    ('\u{1C83}', '\u{0421}'),
    ('\u{1C84}', '\u{1C85}'),
    ('\u{1C85}', '\u{0422}'),
    ('\u{1C86}', '\u{042A}'),
    ('\u{1C87}', '\u{0462}'),
    ('\u{1C88}', '\u{A64A}'),
    ('\u{1E60}', '\u{1E61}'),
    ('\u{1E61}', '\u{1E9B}'),
    ('\u{1E9B}', '\u{1E60}'),
    ('\u{1E9E}', '\u{00DF}'),
    ('\u{1FBE}', '\u{0345}'),
    ('\u{2126}', '\u{03A9}'),
    ('\u{212A}', '\u{004B}'),
    ('\u{212B}', '\u{00C5}'),
    ('\u{A64A}', '\u{A64B}'),
    ('\u{A64B}', '\u{1C88}'),
];

/// Next character in `c`'s simple case-fold orbit.
///
/// Two-member orbits reduce to swapping upper and lower case; characters
/// without a single-character case mapping fold to themselves.
pub fn simple_fold(c: char) -> char {
    if let Ok(idx) = CASE_ORBIT.binary_search_by(|(from, _)| from.cmp(&c)) {
        return CASE_ORBIT[idx].1;
    }
    if let Some(lower) = single(c.to_lowercase()) {
        if lower != c {
            return lower;
        }
    }
    single(c.to_uppercase()).unwrap_or(c)
}

/// The sole element of a case-mapping iterator, if it has exactly one.
fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let first = it.next()?;
    match it.next() {
        None => Some(first),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "Now is the time for all good men to come to the aid of their country.";

    #[test]
    fn test_upper() {
        assert_eq!(
            transform(CaseStyle::Upper, SENTENCE),
            "NOW IS THE TIME FOR ALL GOOD MEN TO COME TO THE AID OF THEIR COUNTRY."
        );
    }

    #[test]
    fn test_lower() {
        assert_eq!(
            transform(CaseStyle::Lower, SENTENCE),
            "now is the time for all good men to come to the aid of their country."
        );
    }

    #[test]
    fn test_snake() {
        assert_eq!(
            transform(CaseStyle::Snake, SENTENCE),
            "now_is_the_time_for_all_good_men_to_come_to_the_aid_of_their_country."
        );
    }

    #[test]
    fn test_kebab() {
        assert_eq!(
            transform(CaseStyle::Kebab, SENTENCE),
            "now-is-the-time-for-all-good-men-to-come-to-the-aid-of-their-country."
        );
    }

    #[test]
    fn test_title() {
        assert_eq!(
            transform(CaseStyle::Title, SENTENCE),
            "Now Is The Time For All Good Men To Come To The Aid Of Their Country."
        );
    }

    #[test]
    fn test_camel_and_pascal() {
        let input = "Now is the time for ALL good men";
        assert_eq!(
            transform(CaseStyle::Camel, input),
            "nowIsTheTimeForALLGoodMen"
        );
        assert_eq!(
            transform(CaseStyle::Pascal, input),
            "NowIsTheTimeForALLGoodMen"
        );
    }

    #[test]
    fn test_snake_all_caps_lowers_first_character() {
        assert_eq!(
            transform(CaseStyle::SnakeAllCaps, "Now is the time"),
            "nOW_IS_THE_TIME"
        );
        assert_eq!(transform(CaseStyle::SnakeAllCaps, "x"), "x");
    }

    #[test]
    fn test_separated_camel_and_pascal_variants() {
        let input = "Now is the TIME";
        assert_eq!(transform(CaseStyle::SnakeCamel, input), "now_Is_The_Time");
        assert_eq!(transform(CaseStyle::SnakePascal, input), "Now_Is_The_Time");
        assert_eq!(transform(CaseStyle::KebabCamel, input), "now-Is-The-Time");
        assert_eq!(transform(CaseStyle::KebabPascal, input), "Now-Is-The-Time");
    }

    #[test]
    fn test_none_yields_empty() {
        assert_eq!(transform(CaseStyle::None, SENTENCE), "");
    }

    #[test]
    fn test_reverse_folds_rather_than_toggles() {
        assert_eq!(transform(CaseStyle::Reverse, "Now"), "nOW");
        // 's' folds to LATIN SMALL LETTER LONG S, not 'S'.
        assert_eq!(transform(CaseStyle::Reverse, "is"), "I\u{017F}");
        // 'k' folds to KELVIN SIGN.
        assert_eq!(transform(CaseStyle::Reverse, "k"), "\u{212A}");
        assert_eq!(transform(CaseStyle::Reverse, "42 !"), "42 !");
    }

    #[test]
    fn test_fold_orbit_cycles() {
        let mut c = 'k';
        let mut seen = vec![c];
        for _ in 0..2 {
            c = simple_fold(c);
            seen.push(c);
        }
        assert_eq!(seen, vec!['k', '\u{212A}', 'K']);
        assert_eq!(simple_fold('K'), 'k');
    }

    #[test]
    fn test_cyrillic_orbits_include_historic_forms() {
        // ve -> rounded ve -> capital VE -> ve
        assert_eq!(simple_fold('\u{0432}'), '\u{1C80}');
        assert_eq!(simple_fold('\u{1C80}'), '\u{0412}');
        assert_eq!(simple_fold('\u{0412}'), '\u{0432}');
        // The four-member te orbit passes through both historic forms.
        assert_eq!(simple_fold('\u{0442}'), '\u{1C84}');
        assert_eq!(simple_fold('\u{1C84}'), '\u{1C85}');
        assert_eq!(simple_fold('\u{1C85}'), '\u{0422}');
        assert_eq!(simple_fold('\u{A64B}'), '\u{1C88}');
        // Cyrillic letters outside those orbits still swap case.
        assert_eq!(simple_fold('\u{0431}'), '\u{0411}');
    }

    #[test]
    fn test_case_orbit_is_sorted() {
        assert!(CASE_ORBIT.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_projection_styles_are_idempotent() {
        let styles = [
            CaseStyle::Upper,
            CaseStyle::Lower,
            CaseStyle::Title,
            CaseStyle::Camel,
            CaseStyle::Pascal,
            CaseStyle::Snake,
            CaseStyle::SnakeAllCaps,
            CaseStyle::Kebab,
        ];
        for style in styles {
            let once = transform(style, SENTENCE);
            let twice = transform(style, &once);
            assert_eq!(once, twice, "{style} is not idempotent");
        }
    }

    #[test]
    fn test_empty_input() {
        for style in CaseStyle::all() {
            assert_eq!(transform(*style, ""), "", "{style} on empty input");
        }
    }

    #[test]
    fn test_unicode_first_character() {
        assert_eq!(transform(CaseStyle::Camel, "Élan vital"), "élanVital");
        assert_eq!(transform(CaseStyle::Title, "élan vital"), "Élan Vital");
        assert_eq!(transform(CaseStyle::Title, "ßa b"), "SSa B");
    }

    #[test]
    fn test_only_space_is_a_word_boundary() {
        assert_eq!(transform(CaseStyle::Snake, "a\tb c"), "a\tb_c");
        assert_eq!(transform(CaseStyle::Pascal, "a-b c"), "A-bC");
    }

    #[test]
    fn test_unknown_name_passes_through() {
        assert_eq!(transform_named("sponge", "MiXeD"), "MiXeD");
        assert_eq!(transform_named("upper", "mixed"), "MIXED");
        assert_eq!(
            CaseSelection::Unrecognized("sponge".to_string()).apply("keep me"),
            "keep me"
        );
    }
}
