//! npm-style version ranges
//!
//! Catalog frontmatter writes ranges the way `package.json` does:
//! space-separated comparators (`>=1.0.0 <2.0.0`), hyphen ranges
//! (`1.0.0 - 1.9.9`), X-ranges (`1.0`, `1.x`, `*`) and `||` unions. Each
//! alternative is rewritten into a comma-separated [`VersionReq`].

use semver::{Version, VersionReq};

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '^', '~'];

/// A union of comparator sets; a version matches when any set matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse an npm range, `None` when any alternative is not a range
    pub fn parse(range: &str) -> Option<Self> {
        let alternatives = range
            .split("||")
            .map(|alternative| {
                let translated = translate(alternative.trim())?;
                VersionReq::parse(&translated).ok()
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { alternatives })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Numeric components of a possibly partial version, plus any prerelease/build suffix
struct Partial<'a> {
    numbers: Vec<&'a str>,
    suffix: &'a str,
}

impl<'a> Partial<'a> {
    fn parse(version: &'a str) -> Option<Self> {
        let version = version.trim_start_matches(['v', 'V']);
        let split = version.find(['-', '+']).unwrap_or(version.len());
        let (core, suffix) = version.split_at(split);

        let mut numbers = Vec::new();
        for component in core.split('.') {
            match component {
                "x" | "X" | "*" => break,
                number if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
                    numbers.push(number)
                }
                _ => return None,
            }
        }
        if numbers.len() > 3 || (!suffix.is_empty() && numbers.len() < 3) {
            return None;
        }
        Some(Self { numbers, suffix })
    }

    fn is_wildcard(&self) -> bool {
        self.numbers.is_empty()
    }

    fn render(&self) -> String {
        format!("{}{}", self.numbers.join("."), self.suffix)
    }
}

fn translate(alternative: &str) -> Option<String> {
    if let Some((low, high)) = alternative.split_once(" - ") {
        let low = Partial::parse(low.trim())?;
        let high = Partial::parse(high.trim())?;
        let mut comparators = Vec::new();
        if !low.is_wildcard() {
            comparators.push(format!(">={}", low.render()));
        }
        if !high.is_wildcard() {
            comparators.push(format!("<={}", high.render()));
        }
        return Some(join(comparators));
    }

    let mut comparators = Vec::new();
    let mut pending_operator: Option<&str> = None;
    for token in alternative
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        if token.chars().all(|c| OPERATOR_CHARS.contains(&c)) {
            if pending_operator.replace(token).is_some() {
                return None;
            }
            continue;
        }
        let comparator = match pending_operator.take() {
            Some(operator) => format!("{operator}{token}"),
            None => token.to_string(),
        };
        if let Some(comparator) = translate_comparator(&comparator)? {
            comparators.push(comparator);
        }
    }
    if pending_operator.is_some() {
        return None;
    }
    Some(join(comparators))
}

/// One comparator; `Some(None)` is a wildcard that constrains nothing
fn translate_comparator(comparator: &str) -> Option<Option<String>> {
    let split = comparator
        .find(|c: char| !OPERATOR_CHARS.contains(&c))
        .unwrap_or(comparator.len());
    let (operator, version) = comparator.split_at(split);
    let partial = Partial::parse(version)?;
    if partial.is_wildcard() {
        return match operator {
            "" | "=" | ">=" | "<=" | "^" | "~" => Some(None),
            _ => None,
        };
    }

    match operator {
        // bare X-ranges: `1.0` is 1.0.x, `1.2.3` is exactly 1.2.3
        "" | "=" => Some(Some(format!("={}", partial.render()))),
        ">" | ">=" | "<" | "<=" | "^" | "~" => Some(Some(format!("{operator}{}", partial.render()))),
        _ => None,
    }
}

fn join(comparators: Vec<String>) -> String {
    if comparators.is_empty() {
        "*".to_string()
    } else {
        comparators.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching(range: &str, versions: &[&str]) -> Vec<String> {
        let range = VersionRange::parse(range).unwrap();
        versions
            .iter()
            .filter(|v| range.matches(&Version::parse(v).unwrap()))
            .map(|v| v.to_string())
            .collect()
    }

    const VERSIONS: [&str; 4] = ["1.0.5", "1.5.1", "2.0.0", "2.1.0-beta.1"];

    #[test]
    fn test_space_separated_comparators() {
        assert_eq!(matching(">=1.0.0 <2.0.0", &VERSIONS), vec!["1.0.5", "1.5.1"]);
        assert_eq!(matching(">= 1.5.0", &VERSIONS), vec!["1.5.1", "2.0.0"]);
        assert_eq!(matching(">=1.0.0, <1.5.0", &VERSIONS), vec!["1.0.5"]);
    }

    #[test]
    fn test_hyphen_ranges() {
        assert_eq!(matching("1.0.0 - 1.9.9", &VERSIONS), vec!["1.0.5", "1.5.1"]);
        assert_eq!(matching("1.0.0 - 1.5", &VERSIONS), vec!["1.0.5", "1.5.1"]);
        assert_eq!(matching("1.1 - 2", &VERSIONS), vec!["1.5.1", "2.0.0"]);
    }

    #[test]
    fn test_unions() {
        assert_eq!(matching("^1.0.0 || ^2.0.0", &VERSIONS), vec!["1.0.5", "1.5.1", "2.0.0"]);
        assert_eq!(matching("1.0.5 || >=2.0.0", &VERSIONS), vec!["1.0.5", "2.0.0"]);
    }

    #[test]
    fn test_x_ranges() {
        assert_eq!(matching("1.0", &VERSIONS), vec!["1.0.5"]);
        assert_eq!(matching("1.x", &VERSIONS), vec!["1.0.5", "1.5.1"]);
        assert_eq!(matching("1", &VERSIONS), vec!["1.0.5", "1.5.1"]);
        assert_eq!(matching("*", &VERSIONS), vec!["1.0.5", "1.5.1", "2.0.0"]);
        assert_eq!(matching("v1.5.1", &VERSIONS), vec!["1.5.1"]);
    }

    #[test]
    fn test_caret_and_tilde() {
        assert_eq!(matching("^1.0.0", &VERSIONS), vec!["1.0.5", "1.5.1"]);
        assert_eq!(matching("~1.0", &VERSIONS), vec!["1.0.5"]);
        assert_eq!(matching("~2", &VERSIONS), vec!["2.0.0"]);
    }

    #[test]
    fn test_rejects_non_ranges() {
        assert!(VersionRange::parse("beta").is_none());
        assert!(VersionRange::parse(">=").is_none());
        assert!(VersionRange::parse("1.2.3.4").is_none());
        assert!(VersionRange::parse("^1.0.0 || draft").is_none());
    }
}
