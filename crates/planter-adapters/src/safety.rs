//! Root directory safety gate.
//!
//! Strict, read-only validation of a target root before anything writes
//! under it. A blocked verdict stops execution; warnings are advisory and
//! can be bypassed.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

/// Environment variables whose paths are protected when set.
const PROTECTED_ENV_VARS: &[&str] = &[
    "SystemRoot",
    "windir",
    "ProgramFiles",
    "ProgramFiles(x86)",
    "ProgramData",
    "Public",
    "APPDATA",
    "LOCALAPPDATA",
];

/// Directories that are always protected when present.
const PROTECTED_BUILTINS: &[&str] = &[
    "/bin", "/boot", "/dev", "/etc", "/lib", "/proc", "/sbin", "/sys", "/usr", "/var",
];

/// Why a root was rejected outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BlockedReason {
    EmptyPath,
    Unresolvable { detail: String },
    DoesNotExist,
    NotADirectory,
    FilesystemRoot,
    SystemDirectory,
    InsideSystemDirectory { ancestor: PathBuf },
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "path is empty"),
            Self::Unresolvable { detail } => write!(f, "path cannot be resolved: {detail}"),
            Self::DoesNotExist => write!(f, "path does not exist"),
            Self::NotADirectory => write!(f, "path is not a directory"),
            Self::FilesystemRoot => write!(f, "path is a filesystem root"),
            Self::SystemDirectory => write!(f, "path is a protected system directory"),
            Self::InsideSystemDirectory { ancestor } => write!(
                f,
                "path is inside the protected system directory {}",
                ancestor.display()
            ),
        }
    }
}

/// Verdict of the safety gate.
#[derive(Debug, Clone, Serialize)]
pub struct RootCheck {
    /// The path as given.
    pub path: PathBuf,
    /// Canonicalized path, when resolution got that far.
    pub resolved: Option<PathBuf>,
    /// Present when the path must not be used.
    pub blocked: Option<BlockedReason>,
    /// Advisory findings that do not block on their own.
    pub warnings: Vec<String>,
}

impl RootCheck {
    pub fn is_safe(&self) -> bool {
        self.blocked.is_none()
    }

    fn blocked(path: &Path, reason: BlockedReason) -> Self {
        Self {
            path: path.to_path_buf(),
            resolved: None,
            blocked: Some(reason),
            warnings: Vec::new(),
        }
    }
}

/// Validate a prospective root directory without touching it.
pub fn check_root(path: &Path) -> RootCheck {
    if path.as_os_str().is_empty() {
        return RootCheck::blocked(path, BlockedReason::EmptyPath);
    }
    if !path.exists() {
        return RootCheck::blocked(path, BlockedReason::DoesNotExist);
    }

    let resolved = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(e) => {
            return RootCheck::blocked(
                path,
                BlockedReason::Unresolvable {
                    detail: e.to_string(),
                },
            );
        }
    };

    let mut check = RootCheck {
        path: path.to_path_buf(),
        resolved: Some(resolved.clone()),
        blocked: None,
        warnings: Vec::new(),
    };

    if !resolved.is_dir() {
        check.blocked = Some(BlockedReason::NotADirectory);
        return check;
    }
    if resolved.parent().is_none() {
        check.blocked = Some(BlockedReason::FilesystemRoot);
        return check;
    }

    for protected in protected_paths() {
        if resolved == protected {
            check.blocked = Some(BlockedReason::SystemDirectory);
            return check;
        }
        if resolved.starts_with(&protected) {
            check.blocked = Some(BlockedReason::InsideSystemDirectory {
                ancestor: protected,
            });
            return check;
        }
    }

    if let Some(home) = home_dir() {
        if resolved == home {
            check
                .warnings
                .push("path is your home directory; plans here touch it directly".to_string());
        }
    }

    debug!(path = %resolved.display(), warnings = check.warnings.len(), "root check passed");
    check
}

/// Resolved set of protected directories on this machine.
fn protected_paths() -> BTreeSet<PathBuf> {
    let mut protected = BTreeSet::new();

    for var in PROTECTED_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if let Ok(resolved) = Path::new(&value).canonicalize() {
                protected.insert(resolved);
            }
        }
    }
    for builtin in PROTECTED_BUILTINS {
        if let Ok(resolved) = Path::new(builtin).canonicalize() {
            protected.insert(resolved);
        }
    }

    protected
}

fn home_dir() -> Option<PathBuf> {
    let value = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    Path::new(&value).canonicalize().ok()
}
