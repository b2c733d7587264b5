//! Linked issue extraction
//!
//! Finds the issue a pull request closes by looking for GitHub's closing
//! keywords (`Fixes #12`, `closes #3`, ...) in the PR description. Not
//! finding one is a normal outcome.

use std::sync::LazyLock;

use regex::Regex;

/// Keyword, exactly one whitespace character, then `#<digits>`
static CLOSING_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:close|closes|closed|fix|fixes|fixed|resolve|resolves|resolved)\s#(\d+)")
        .expect("valid closing keyword pattern")
});

/// Issue number referenced by the first closing keyword in `body`.
///
/// Only the first match counts: `Fixes #1 and fixes #2` yields `Some(1)`.
/// A number that is zero or does not fit in a `u64` is treated as no match.
pub fn extract_issue_reference(body: &str) -> Option<u64> {
    let captures = CLOSING_KEYWORD.captures(body)?;
    captures
        .get(1)?
        .as_str()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_each_closing_keyword() {
        for keyword in [
            "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves",
            "resolved",
        ] {
            let body = format!("This PR {keyword} #42 for good");
            assert_eq!(extract_issue_reference(&body), Some(42), "keyword {keyword}");
        }
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(extract_issue_reference("FIXES #7"), Some(7));
        assert_eq!(extract_issue_reference("Resolves #8"), Some(8));
        assert_eq!(extract_issue_reference("cLoSeD #9"), Some(9));
    }

    #[test]
    fn allows_one_whitespace_character_before_hash() {
        assert_eq!(extract_issue_reference("Fixes\t#5"), Some(5));
        assert_eq!(extract_issue_reference("Fixes\n#6"), Some(6));
        assert_eq!(extract_issue_reference("Fixes #11"), Some(11));
    }

    #[test]
    fn wider_gap_before_hash_does_not_match() {
        assert_eq!(extract_issue_reference("Fixes  #11"), None);
        assert_eq!(extract_issue_reference("Fixes\n\n#6"), None);
        assert_eq!(extract_issue_reference("Closes \t#4"), None);
        // A later well-formed reference still counts
        assert_eq!(extract_issue_reference("Fixes  #1, closes #2"), Some(2));
    }

    #[test]
    fn non_closing_references_do_not_match() {
        assert_eq!(extract_issue_reference("Relates to #7"), None);
        assert_eq!(extract_issue_reference("See #7"), None);
        assert_eq!(extract_issue_reference("Fixes#7"), None);
        assert_eq!(extract_issue_reference("Fixes issue 7"), None);
        assert_eq!(extract_issue_reference(""), None);
    }

    #[test]
    fn only_first_reference_is_scored() {
        assert_eq!(extract_issue_reference("Fixes #1 and fixes #2"), Some(1));
        assert_eq!(
            extract_issue_reference("Relates to #3.\n\nCloses #4, resolves #5"),
            Some(4)
        );
    }

    #[test]
    fn keyword_inside_a_longer_word_still_matches() {
        // "prefixes #3" contains "fixes #3"; GitHub would not link it but the
        // matcher does not require a word boundary.
        assert_eq!(extract_issue_reference("prefixes #3"), Some(3));
    }

    #[test]
    fn zero_and_overflowing_numbers_are_ignored() {
        assert_eq!(extract_issue_reference("Fixes #0"), None);
        assert_eq!(
            extract_issue_reference("Fixes #99999999999999999999999999"),
            None
        );
    }
}
