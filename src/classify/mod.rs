//! Archive and split-volume classification by file name.
//!
//! Every function here is a pure string predicate: nothing touches the filesystem.
//! The predicates are independent, so a single name may satisfy several of them
//! (a plain `movie.rar` is both an archive and a first split).
//!
//! # Example
//!
//! ```
//! use storekeep_core::classify::{get_base_name, is_archive_split, is_first_archive_split};
//!
//! assert!(is_first_archive_split("movie.part01.rar"));
//! assert!(!is_first_archive_split("movie.part02.rar"));
//! assert!(is_archive_split("movie.r01"));
//! assert_eq!(get_base_name("movie.TAR.GZ").unwrap(), "movie");
//! ```

mod error;

pub use error::ClassifyError;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::constants::ARCHIVE_EXTENSIONS;

#[allow(clippy::expect_used)]
static RAR_FIRST_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\.|_)part0*1\.rar$").expect("rar first part regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static RAR_NUMBERED_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\.|_)part\d+\.rar$").expect("rar numbered part regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static SEVEN_ZIP_FIRST_VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\.|_)7z\.0*1$").expect("7z first volume regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static ZIP_FIRST_VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\.|_)zip\.0*1$").expect("zip first volume regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static ARCHIVE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.r\d+$|\.7z\.\d+$|\.z\d+$|\.zip\.\d+$").expect("archive split regex is valid") // Static pattern, safe to panic
});

/// One row of the first-split rule table.
struct FirstSplitRule {
    label: &'static str,
    matches: fn(&str) -> bool,
}

/// Evaluated top to bottom; the first matching row decides.
static FIRST_SPLIT_RULES: [FirstSplitRule; 4] = [
    FirstSplitRule {
        label: "rar_part_one",
        matches: is_rar_first_part,
    },
    FirstSplitRule {
        label: "7z_volume_one",
        matches: is_seven_zip_first_volume,
    },
    FirstSplitRule {
        label: "zip_volume_one",
        matches: is_zip_first_volume,
    },
    FirstSplitRule {
        label: "lone_rar",
        matches: is_lone_rar,
    },
];

fn is_rar_first_part(name: &str) -> bool {
    RAR_FIRST_PART.is_match(name)
}

fn is_seven_zip_first_volume(name: &str) -> bool {
    SEVEN_ZIP_FIRST_VOLUME.is_match(name)
}

fn is_zip_first_volume(name: &str) -> bool {
    ZIP_FIRST_VOLUME.is_match(name)
}

// A `.rar` without any part numbering is routed as the head of its own set,
// even when it is a complete single-volume archive.
fn is_lone_rar(name: &str) -> bool {
    name.ends_with(".rar") && !RAR_NUMBERED_PART.is_match(name)
}

/// Case-insensitive suffix test for ASCII suffixes.
fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    let Some(start) = name.len().checked_sub(suffix.len()) else {
        return false;
    };
    name.is_char_boundary(start) && name[start..].eq_ignore_ascii_case(suffix)
}

/// Returns the first entry of [`ARCHIVE_EXTENSIONS`] that `name` ends with, ignoring case.
#[must_use]
pub fn archive_extension(name: &str) -> Option<&'static str> {
    ARCHIVE_EXTENSIONS
        .iter()
        .copied()
        .find(|extension| ends_with_ignore_case(name, extension))
}

/// Returns true if `name` ends with a recognized archive extension (case-insensitive).
#[must_use]
pub fn is_archive(name: &str) -> bool {
    archive_extension(name).is_some()
}

/// Returns true if `name` is the first volume of a split archive.
///
/// Matches `*.part01.rar` / `*_part1.rar` (any number of leading zeros), `*.7z.001`,
/// `*.zip.001`, and any `.rar` that carries no part number at all.
#[must_use]
pub fn is_first_archive_split(name: &str) -> bool {
    first_split_rule(name).is_some()
}

fn first_split_rule(name: &str) -> Option<&'static str> {
    let rule = FIRST_SPLIT_RULES.iter().find(|rule| (rule.matches)(name))?;
    trace!(name, rule = rule.label, "first split rule matched");
    Some(rule.label)
}

/// Returns true if `name` is a numbered continuation volume (`.r00`, `.7z.002`, `.z01`, `.zip.003`).
#[must_use]
pub fn is_archive_split(name: &str) -> bool {
    ARCHIVE_SPLIT.is_match(name)
}

/// Strips the first matching archive extension from the end of `path`.
///
/// # Errors
///
/// Returns [`ClassifyError::UnsupportedFormat`] when no recognized extension matches.
pub fn get_base_name(path: &str) -> Result<String, ClassifyError> {
    let extension =
        archive_extension(path).ok_or_else(|| ClassifyError::unsupported_format(path))?;
    Ok(path[..path.len() - extension.len()].to_string())
}

/// Combined classification of a single name, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameClass {
    /// The classified name.
    pub name: String,
    /// Matching archive extension, if any.
    pub extension: Option<&'static str>,
    /// Result of [`is_first_archive_split`].
    pub first_split: bool,
    /// Label of the first-split rule that matched.
    pub first_split_rule: Option<&'static str>,
    /// Result of [`is_archive_split`].
    pub continuation_split: bool,
    /// Result of [`get_base_name`], when the name is an archive.
    pub base_name: Option<String>,
}

/// Runs every predicate against `name`.
#[must_use]
pub fn classify_name(name: &str) -> NameClass {
    let extension = archive_extension(name);
    let first_split_rule = first_split_rule(name);
    NameClass {
        name: name.to_string(),
        extension,
        first_split: first_split_rule.is_some(),
        first_split_rule,
        continuation_split: is_archive_split(name),
        base_name: get_base_name(name).ok(),
    }
}
