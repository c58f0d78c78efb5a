//! Fixed name tables for archive classification and cleanup.

/// Recognized archive extensions, in match order.
///
/// [`crate::classify::get_base_name`] strips the first entry the name ends with,
/// so compound extensions (`.tar.gz`) must stay ahead of their tails (`.gz`).
pub const ARCHIVE_EXTENSIONS: [&str; 38] = [
    ".tar.bz2",
    ".tar.gz",
    ".bz2",
    ".gz",
    ".tar.xz",
    ".tar",
    ".tbz2",
    ".tgz",
    ".lzma2",
    ".zip",
    ".7z",
    ".z",
    ".rar",
    ".iso",
    ".wim",
    ".cab",
    ".apm",
    ".arj",
    ".chm",
    ".cpio",
    ".cramfs",
    ".deb",
    ".dmg",
    ".fat",
    ".hfs",
    ".lzh",
    ".lzma",
    ".mbr",
    ".msi",
    ".mslz",
    ".nsis",
    ".ntfs",
    ".rpm",
    ".squashfs",
    ".udf",
    ".vhd",
    ".xar",
    ".zst",
];

/// In-progress download markers left behind by torrent clients.
pub const JUNK_FILE_SUFFIXES: [&str; 1] = [".!qB"];

/// Suffix of hidden partial-piece files (`.name.parts`).
pub const HIDDEN_PARTS_SUFFIX: &str = ".parts";

/// Prefix marking a hidden file.
pub const HIDDEN_FILE_PREFIX: &str = ".";

/// Directory name suffixes for scratch trees that are always removed whole.
pub const SCRATCH_DIR_SUFFIXES: [&str; 3] = [".unwanted", "splited_files_zee", "copied_zee"];

/// Content types that are real multi-volume containers and must not be concatenated.
pub const NON_JOINABLE_MIME_TYPES: [&str; 2] = ["application/x-7z-compressed", "application/zip"];
