//! Reassembly of split files (`name.001`, `name.002`, ...) into a single file.
//!
//! A set is seeded by names ending in `.0<digits>`. Each seed is screened with a
//! [`ContentProbe`] so real multi-volume containers (7z, zip) are left for
//! extraction; one seed that passes is enough to join the set. Every
//! `<base>.<digits>` fragment is then concatenated in numeric suffix order by a
//! [`CommandExecutor`]. Source fragments are only deleted after every set in the
//! directory has been attempted, and only for sets that joined cleanly.
//!
//! # Example
//!
//! ```no_run
//! use storekeep_core::join::Joiner;
//!
//! # async fn example() -> std::io::Result<()> {
//! let report = Joiner::default().join_files("/srv/downloads/1234").await?;
//! println!("joined {} set(s)", report.joined.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod exec;
mod probe;

pub use error::ConcatenationFailure;
pub use exec::{CommandExecutor, CommandOutput, ShellExecutor, concat_command, shell_quote};
pub use probe::{ContentProbe, MagicProbe, sniff_mime_type};

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::blocking::run_blocking;
use crate::clean::remove_single_file;
use crate::constants::NON_JOINABLE_MIME_TYPES;

/// A set needs at least this many fragments to be joined.
pub const MIN_FRAGMENTS: usize = 2;

#[allow(clippy::expect_used)]
static FRAGMENT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.0[0-9]+$").expect("fragment suffix regex is valid") // Static pattern, safe to panic
});

/// Overall result of one [`Joiner::join_files`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStatus {
    /// No fragment set qualified for joining.
    NothingToJoin,
    /// Every attempted set joined.
    Completed,
    /// Some sets joined, some failed.
    Partial,
    /// Every attempted set failed.
    Failed,
}

/// Per-directory join outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JoinReport {
    /// Output files written by successful joins.
    pub joined: Vec<PathBuf>,
    /// Sets whose concatenation failed; their fragments were kept.
    pub failed: Vec<ConcatenationFailure>,
    /// Base names of sets whose every seed probed as a container archive.
    pub skipped: Vec<String>,
    /// Fragment files deleted after successful joins.
    pub fragments_removed: u64,
}

impl JoinReport {
    /// Summarizes the report.
    #[must_use]
    pub fn status(&self) -> JoinStatus {
        match (self.joined.is_empty(), self.failed.is_empty()) {
            (true, true) => JoinStatus::NothingToJoin,
            (false, true) => JoinStatus::Completed,
            (false, false) => JoinStatus::Partial,
            (true, false) => JoinStatus::Failed,
        }
    }
}

/// The fragments of one base name found in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSet {
    /// Output name; the fragments without their numeric suffix.
    pub base: String,
    /// Names ending in `.0<digits>`; only these are probed.
    pub candidates: Vec<String>,
    /// Every `<base>.<digits>` name, in numeric suffix order.
    pub fragments: Vec<String>,
}

/// Returns the regex matching every fragment name of `base` (`<base>.<digits>`).
///
/// # Errors
///
/// Returns an error only if the escaped pattern exceeds the regex size limit.
pub fn fragment_pattern(base: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"^{}\.[0-9]+$", regex::escape(base)))
}

/// Numeric order of a fragment suffix, without parsing into a bounded integer.
fn suffix_order(name: &str) -> (usize, &str) {
    let digits = name.rsplit_once('.').map_or("", |(_, suffix)| suffix);
    let significant = digits.trim_start_matches('0');
    (significant.len(), significant)
}

/// Groups `names` into fragment sets, ordered by base name.
///
/// Only names ending in `.0<digits>` seed a set. Sets with an empty base are ignored.
#[must_use]
pub fn fragment_sets(names: &[String]) -> Vec<FragmentSet> {
    let bases: BTreeSet<&str> = names
        .iter()
        .filter(|name| FRAGMENT_SUFFIX.is_match(name))
        .filter_map(|name| name.rsplit_once('.').map(|(base, _)| base))
        .filter(|base| !base.is_empty())
        .collect();

    let mut sets = Vec::with_capacity(bases.len());
    for base in bases {
        let pattern = match fragment_pattern(base) {
            Ok(pattern) => pattern,
            Err(error) => {
                warn!(base, error = %error, "cannot build fragment pattern, skipping set");
                continue;
            }
        };
        let mut fragments: Vec<String> = names
            .iter()
            .filter(|name| pattern.is_match(name))
            .cloned()
            .collect();
        fragments.sort_by(|a, b| suffix_order(a).cmp(&suffix_order(b)).then_with(|| a.cmp(b)));
        let candidates = fragments
            .iter()
            .filter(|name| FRAGMENT_SUFFIX.is_match(name))
            .cloned()
            .collect();
        sets.push(FragmentSet {
            base: base.to_string(),
            candidates,
            fragments,
        });
    }
    sets
}

/// Detects and joins split-file sets inside one directory.
pub struct Joiner {
    probe: Arc<dyn ContentProbe>,
    executor: Arc<dyn CommandExecutor>,
}

impl Default for Joiner {
    fn default() -> Self {
        Self::new(Arc::new(MagicProbe::new()), Arc::new(ShellExecutor::new()))
    }
}

impl Joiner {
    /// Creates a joiner with the given collaborators.
    #[must_use]
    pub fn new(probe: Arc<dyn ContentProbe>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { probe, executor }
    }

    /// Joins every fragment set among the immediate files of `dir`.
    ///
    /// Concatenation failures are logged and reported, never returned as errors.
    /// Each concatenation runs on its own task: dropping this future does not stop
    /// a running command, and a failed command still has its partial output removed.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` cannot be listed.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn join_files(&self, dir: impl AsRef<Path>) -> io::Result<JoinReport> {
        let dir = dir.as_ref();
        let names = list_file_names(dir).await?;
        let mut report = JoinReport::default();
        let mut joined_fragments = Vec::new();

        for set in fragment_sets(&names) {
            if set.fragments.len() < MIN_FRAGMENTS {
                debug!(base = %set.base, "single fragment, not a split set");
                continue;
            }
            if !self.has_joinable_candidate(dir, &set).await {
                report.skipped.push(set.base);
                continue;
            }
            match self.concatenate(dir, &set).await {
                Ok(output) => {
                    joined_fragments.extend(set.fragments.iter().map(|name| dir.join(name)));
                    report.joined.push(output);
                }
                Err(failure) => report.failed.push(failure),
            }
        }

        if report.joined.is_empty() && report.failed.is_empty() {
            warn!(dir = %dir.display(), "No files to join!");
            return Ok(report);
        }
        if report.joined.is_empty() {
            return Ok(report);
        }

        info!(dir = %dir.display(), joined = report.joined.len(), "Join completed");
        report.fragments_removed = remove_fragments(joined_fragments).await;
        Ok(report)
    }

    async fn has_joinable_candidate(&self, dir: &Path, set: &FragmentSet) -> bool {
        for candidate in &set.candidates {
            let path = dir.join(candidate);
            match self.probe.mime_type(&path).await {
                Ok(mime) if NON_JOINABLE_MIME_TYPES.contains(&mime.as_str()) => {
                    debug!(
                        candidate = %candidate,
                        mime = %mime,
                        "fragment is a container archive"
                    );
                }
                Ok(_) => return true,
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "content probe failed");
                }
            }
        }
        info!(base = %set.base, "no joinable fragment, leaving set alone");
        false
    }

    async fn concatenate(
        &self,
        dir: &Path,
        set: &FragmentSet,
    ) -> Result<PathBuf, ConcatenationFailure> {
        let output = dir.join(&set.base);
        let fragment_paths: Vec<PathBuf> = set.fragments.iter().map(|name| dir.join(name)).collect();
        let command = concat_command(&fragment_paths, &output);

        // The task outlives a dropped caller, partial-output cleanup included.
        let task = tokio::spawn(run_concatenation(
            Arc::clone(&self.executor),
            command,
            set.base.clone(),
            output,
        ));
        match task.await {
            Ok(result) => result,
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => Err(ConcatenationFailure {
                base: set.base.clone(),
                code: -1,
                stderr: error.to_string(),
            }),
        }
    }
}

async fn run_concatenation(
    executor: Arc<dyn CommandExecutor>,
    command: String,
    base: String,
    output: PathBuf,
) -> Result<PathBuf, ConcatenationFailure> {
    let failure = match executor.exec(&command).await {
        Ok(result) if result.success() => {
            debug!(base = %base, "fragments joined");
            return Ok(output);
        }
        Ok(result) => ConcatenationFailure {
            base,
            code: result.code,
            stderr: result.stderr,
        },
        Err(error) => ConcatenationFailure {
            base,
            code: -1,
            stderr: error.to_string(),
        },
    };

    error!(base = %failure.base, code = failure.code, stderr = %failure.stderr, "Failed to join");
    if tokio::fs::metadata(&output)
        .await
        .is_ok_and(|metadata| metadata.is_file())
    {
        run_blocking(move || remove_single_file(&output))
            .await
            .log_failure("remove partial join output");
    }
    Err(failure)
}

async fn list_file_names(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_file = entry
            .file_type()
            .await
            .is_ok_and(|file_type| file_type.is_file());
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!(name = ?raw, "skipping non UTF-8 file name"),
        }
    }
    names.sort();
    Ok(names)
}

async fn remove_fragments(paths: Vec<PathBuf>) -> u64 {
    run_blocking(move || {
        let mut removed = 0;
        for path in paths {
            let outcome = remove_single_file(&path);
            outcome.log_failure("remove joined fragment");
            if outcome.is_deleted() {
                removed += 1;
            }
        }
        removed
    })
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|name| (*name).to_string()).collect()
    }

    /// Reports `application/zip` for the listed file names, octet-stream otherwise.
    struct StaticProbe {
        containers: Vec<String>,
    }

    #[async_trait]
    impl ContentProbe for StaticProbe {
        async fn mime_type(&self, path: &Path) -> io::Result<String> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if self.containers.contains(&name) {
                Ok("application/zip".to_string())
            } else {
                Ok("application/octet-stream".to_string())
            }
        }
    }

    /// Records every command and answers with a fixed exit code.
    struct RecordingExecutor {
        code: i32,
        commands: Mutex<Vec<String>>,
    }

    impl RecordingExecutor {
        fn new(code: i32) -> Self {
            Self {
                code,
                commands: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn exec(&self, command_line: &str) -> io::Result<CommandOutput> {
            self.commands.lock().unwrap().push(command_line.to_string());
            Ok(CommandOutput {
                stdout: String::new(),
                stderr: if self.code == 0 { String::new() } else { "boom".to_string() },
                code: self.code,
            })
        }
    }

    /// Writes a truncated output file after `delay`, then fails.
    struct PartialWriteExecutor {
        output: PathBuf,
        delay: Duration,
    }

    #[async_trait]
    impl CommandExecutor for PartialWriteExecutor {
        async fn exec(&self, _command_line: &str) -> io::Result<CommandOutput> {
            tokio::time::sleep(self.delay).await;
            tokio::fs::write(&self.output, b"trunc").await?;
            Ok(CommandOutput {
                stdout: String::new(),
                stderr: "cat: read error".to_string(),
                code: 1,
            })
        }
    }

    fn write_fragments(dir: &Path, raw: &[&str]) {
        for name in raw {
            fs::write(dir.join(name), name.as_bytes()).unwrap();
        }
    }

    #[test]
    fn test_fragment_sets_groups_by_base() {
        let sets = fragment_sets(&names(&["a.002", "a.001", "b.01", "b.02", "notes.txt", "c.1"]));
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].base, "a");
        assert_eq!(sets[0].fragments, names(&["a.001", "a.002"]));
        assert_eq!(sets[1].base, "b");
        assert_eq!(sets[1].candidates, names(&["b.01", "b.02"]));
    }

    #[test]
    fn test_fragment_sets_orders_by_number_past_three_digits() {
        let sets = fragment_sets(&names(&["big.100", "big.010", "big.099", "big.001", "big.1000"]));
        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets[0].fragments,
            names(&["big.001", "big.010", "big.099", "big.100", "big.1000"])
        );
        assert_eq!(
            sets[0].candidates,
            names(&["big.001", "big.010", "big.099"])
        );
    }

    #[test]
    fn test_fragment_sets_ignores_empty_base() {
        assert!(fragment_sets(&names(&[".001", ".002"])).is_empty());
    }

    #[test]
    fn test_fragment_sets_ignores_non_ascii_digits() {
        // Arabic-Indic digits are Unicode `\d` but not fragment numbers.
        assert!(fragment_sets(&names(&["a.0\u{661}", "a.0\u{662}"])).is_empty());
    }

    #[test]
    fn test_fragment_pattern_escapes_base() {
        let pattern = fragment_pattern("movie (1080p)+x").unwrap();
        assert!(pattern.is_match("movie (1080p)+x.001"));
        assert!(pattern.is_match("movie (1080p)+x.100"));
        assert!(!pattern.is_match("movie 1080p+x.001"));
        assert!(!pattern.is_match("other movie (1080p)+x.001"));
        assert!(!pattern.is_match("movie (1080p)+x.001.bak"));
    }

    #[test]
    fn test_join_status_from_report() {
        let mut report = JoinReport::default();
        assert_eq!(report.status(), JoinStatus::NothingToJoin);
        report.joined.push(PathBuf::from("/dl/a"));
        assert_eq!(report.status(), JoinStatus::Completed);
        report.failed.push(ConcatenationFailure {
            base: "b".to_string(),
            code: 1,
            stderr: String::new(),
        });
        assert_eq!(report.status(), JoinStatus::Partial);
        report.joined.clear();
        assert_eq!(report.status(), JoinStatus::Failed);
    }

    #[tokio::test]
    async fn test_join_files_skips_set_when_every_candidate_is_container() {
        let temp = TempDir::new().unwrap();
        write_fragments(temp.path(), &["disk.7z.001", "disk.7z.002"]);
        let executor = Arc::new(RecordingExecutor::new(0));
        let joiner = Joiner::new(
            Arc::new(StaticProbe {
                containers: names(&["disk.7z.001", "disk.7z.002"]),
            }),
            executor.clone(),
        );

        let report = joiner.join_files(temp.path()).await.unwrap();

        assert_eq!(report.skipped, names(&["disk.7z"]));
        assert_eq!(report.status(), JoinStatus::NothingToJoin);
        assert!(executor.commands.lock().unwrap().is_empty());
        assert!(temp.path().join("disk.7z.001").exists());
    }

    #[tokio::test]
    async fn test_join_files_one_plain_candidate_is_enough() {
        let temp = TempDir::new().unwrap();
        write_fragments(temp.path(), &["backup.zip.001", "backup.zip.002"]);
        let executor = Arc::new(RecordingExecutor::new(0));
        let joiner = Joiner::new(
            Arc::new(StaticProbe {
                containers: names(&["backup.zip.001"]),
            }),
            executor.clone(),
        );

        let report = joiner.join_files(temp.path()).await.unwrap();

        assert_eq!(report.status(), JoinStatus::Completed);
        assert!(report.skipped.is_empty());
        let commands = executor.commands.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].contains("backup.zip.001"));
        assert!(commands[0].contains("backup.zip.002"));
    }

    #[tokio::test]
    async fn test_join_files_ignores_single_fragment() {
        let temp = TempDir::new().unwrap();
        write_fragments(temp.path(), &["report.01"]);
        let executor = Arc::new(RecordingExecutor::new(0));
        let joiner = Joiner::new(Arc::new(StaticProbe { containers: vec![] }), executor.clone());

        let report = joiner.join_files(temp.path()).await.unwrap();

        assert_eq!(report.status(), JoinStatus::NothingToJoin);
        assert!(executor.commands.lock().unwrap().is_empty());
        assert!(temp.path().join("report.01").exists());
    }

    #[tokio::test]
    async fn test_join_files_failure_keeps_fragments() {
        let temp = TempDir::new().unwrap();
        write_fragments(temp.path(), &["a.001", "a.002", "a.003"]);
        let executor = Arc::new(RecordingExecutor::new(1));
        let joiner = Joiner::new(Arc::new(StaticProbe { containers: vec![] }), executor.clone());

        let report = joiner.join_files(temp.path()).await.unwrap();

        assert_eq!(report.status(), JoinStatus::Failed);
        assert_eq!(report.failed[0].base, "a");
        assert_eq!(report.failed[0].stderr, "boom");
        assert_eq!(report.fragments_removed, 0);
        for name in ["a.001", "a.002", "a.003"] {
            assert!(temp.path().join(name).exists(), "{name} must survive");
        }
        let commands = executor.commands.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("cat "));
    }

    #[tokio::test]
    async fn test_join_files_failure_removes_partial_output() {
        let temp = TempDir::new().unwrap();
        write_fragments(temp.path(), &["a.001", "a.002", "a.003"]);
        let joiner = Joiner::new(
            Arc::new(StaticProbe { containers: vec![] }),
            Arc::new(PartialWriteExecutor {
                output: temp.path().join("a"),
                delay: Duration::ZERO,
            }),
        );

        let report = joiner.join_files(temp.path()).await.unwrap();

        assert_eq!(report.status(), JoinStatus::Failed);
        assert_eq!(report.failed[0].code, 1);
        assert!(!temp.path().join("a").exists(), "partial output must be removed");
        for name in ["a.001", "a.002", "a.003"] {
            assert!(temp.path().join(name).exists(), "{name} must survive");
        }
    }

    #[tokio::test]
    async fn test_dropped_join_still_cleans_partial_output() {
        let temp = TempDir::new().unwrap();
        write_fragments(temp.path(), &["a.001", "a.002"]);
        let joiner = Joiner::new(
            Arc::new(StaticProbe { containers: vec![] }),
            Arc::new(PartialWriteExecutor {
                output: temp.path().join("a"),
                delay: Duration::from_millis(300),
            }),
        );

        let detached =
            tokio::time::timeout(Duration::from_millis(50), joiner.join_files(temp.path())).await;
        assert!(detached.is_err(), "join should still be running");

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert!(!temp.path().join("a").exists(), "partial output must be removed");
        assert!(temp.path().join("a.001").exists());
        assert!(temp.path().join("a.002").exists());
    }

    #[tokio::test]
    async fn test_join_files_missing_dir_errors() {
        let temp = TempDir::new().unwrap();
        let result = Joiner::default().join_files(temp.path().join("gone")).await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
