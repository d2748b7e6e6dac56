//! Version resolution
//!
//! Resolves a version token (absent, `latest`, an exact version, or an npm
//! range) against every instance of a resource id. Resolution never fails: no
//! match is an empty result and callers degrade from there.

mod range;

pub use range::VersionRange;

use crate::resources::{CatalogResource, Pointer};
use semver::Version;
use std::cmp::Ordering;

/// Literal token that pins a reference to the newest version
pub const LATEST: &str = "latest";

/// Anything addressable by `(id, version)`
pub trait Versioned {
    fn resource_id(&self) -> &str;
    fn resource_version(&self) -> &str;
    fn is_archived(&self) -> bool {
        false
    }
}

impl<T: CatalogResource> Versioned for T {
    fn resource_id(&self) -> &str {
        &self.meta().id
    }
    fn resource_version(&self) -> &str {
        &self.meta().version
    }
    fn is_archived(&self) -> bool {
        self.meta().archived
    }
}

/// A parsed version token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionToken {
    /// Absent or `latest`
    Latest,
    /// A concrete version, compared as a string
    Exact(String),
    /// An npm range such as `^1.3.0`, `>=1.0.0 <2.0.0`, `1.x` or `^1 || ^2`
    Range(VersionRange),
}

impl VersionToken {
    pub fn parse(token: Option<&str>) -> Self {
        let token = match token.map(str::trim) {
            None | Some("") | Some(LATEST) => return VersionToken::Latest,
            Some(token) => token,
        };

        if Version::parse(token).is_ok() {
            return VersionToken::Exact(token.to_string());
        }
        match VersionRange::parse(token) {
            Some(range) => VersionToken::Range(range),
            None => VersionToken::Exact(token.to_string()),
        }
    }
}

/// Parse a version loosely: `v1`, `1` and `1.2` become `1.0.0` and `1.2.0`
pub fn coerce(version: &str) -> Option<Version> {
    let trimmed = version.trim().trim_start_matches(['v', 'V']);
    if let Ok(parsed) = Version::parse(trimmed) {
        return Some(parsed);
    }

    let mut parts = trimmed
        .split(|c: char| !c.is_ascii_digit())
        .take_while(|part| !part.is_empty())
        .map(|part| part.parse::<u64>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().and_then(Result::ok).unwrap_or(0);
    let patch = parts.next().and_then(Result::ok).unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

/// Order two version strings, semver-aware with a string fallback
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (coerce(a), coerce(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Whether `version` satisfies `token`
///
/// Equal strings always match. Ranges are checked against the coerced
/// version. `latest` and an absent token are not handled here because their
/// meaning depends on the collection; see [`resolve`] and
/// [`crate::relationships`].
pub fn satisfies(version: &str, token: &str) -> bool {
    if version == token {
        return true;
    }
    match VersionToken::parse(Some(token)) {
        VersionToken::Range(range) => coerce(version).is_some_and(|v| range.matches(&v)),
        VersionToken::Exact(exact) => coerce(version)
            .zip(Version::parse(&exact).ok())
            .is_some_and(|(a, b)| a == b),
        VersionToken::Latest => false,
    }
}

/// The newest version of `id` in the collection
///
/// Instances outside the archive are preferred; if every instance is
/// archived the newest archived one wins.
pub fn latest_version<'a, R: Versioned>(collection: &'a [R], id: &str) -> Option<&'a str> {
    let has_current = collection
        .iter()
        .any(|r| r.resource_id() == id && !r.is_archived());

    collection
        .iter()
        .filter(|r| r.resource_id() == id && (!has_current || !r.is_archived()))
        .map(|r| r.resource_version())
        .max_by(|a, b| compare_versions(a, b))
}

/// Resolve `(id, token)` against the collection
///
/// Returns matches in collection order. A range may match several instances;
/// callers that need one take the first.
pub fn resolve<'a, R: Versioned>(collection: &'a [R], id: &str, token: Option<&str>) -> Vec<&'a R> {
    let same_id = || collection.iter().filter(move |r| r.resource_id() == id);

    match VersionToken::parse(token) {
        VersionToken::Latest => {
            let Some(latest) = latest_version(collection, id) else {
                return Vec::new();
            };
            let current: Vec<&R> = same_id()
                .filter(|r| r.resource_version() == latest && !r.is_archived())
                .collect();
            if current.is_empty() {
                same_id().filter(|r| r.resource_version() == latest).collect()
            } else {
                current
            }
        }
        VersionToken::Exact(version) => {
            let exact: Vec<&R> = same_id().filter(|r| r.resource_version() == version).collect();
            if !exact.is_empty() {
                return exact;
            }
            // "1.0" written in frontmatter still matches a request for "1.0.0"
            match coerce(&version) {
                Some(wanted) if Version::parse(&version).is_ok() => same_id()
                    .filter(|r| coerce(r.resource_version()).as_ref() == Some(&wanted))
                    .collect(),
                _ => Vec::new(),
            }
        }
        VersionToken::Range(range) => {
            let exact: Vec<&R> = same_id()
                .filter(|r| token == Some(r.resource_version()))
                .collect();
            if !exact.is_empty() {
                return exact;
            }
            same_id()
                .filter(|r| coerce(r.resource_version()).is_some_and(|v| range.matches(&v)))
                .collect()
        }
    }
}

/// Resolve a pointer and keep the first match
pub fn resolve_first<'a, R: Versioned, P: Pointer + ?Sized>(collection: &'a [R], pointer: &P) -> Option<&'a R> {
    resolve(collection, pointer.pointer_id(), pointer.pointer_version())
        .into_iter()
        .next()
}

/// Sort version strings newest first
pub fn sort_newest_first(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}
