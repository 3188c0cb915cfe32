//! Capability-scoped helpers for reading inputs and writing run artefacts.

use std::env;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::TriageError;

/// Opens `path` as a directory, creating it and any missing parents first.
///
/// Relative paths are resolved against the current directory, so `..` may
/// walk above it. Every path is then opened from the filesystem root.
pub(crate) fn open_or_create_dir(path: &Utf8Path, label: &str) -> Result<Dir, TriageError> {
    let relative = from_root(path, label)?;
    let anchor = open_ambient("/", label)?;

    if relative.as_str().is_empty() {
        return Ok(anchor);
    }

    anchor
        .create_dir_all(&relative)
        .map_err(|error| TriageError::Io {
            message: format!("failed to create {label} directory '{path}': {error}"),
        })?;
    anchor.open_dir(&relative).map_err(|error| TriageError::Io {
        message: format!("failed to open {label} directory '{path}': {error}"),
    })
}

/// Reads a UTF-8 file, resolving `path` the same way as
/// [`open_or_create_dir`].
pub(crate) fn read_text(path: &Utf8Path, label: &str) -> Result<String, TriageError> {
    let relative = from_root(path, label)?;
    open_ambient("/", label)?
        .read_to_string(&relative)
        .map_err(|error| TriageError::Io {
            message: format!("failed to read {label} '{path}': {error}"),
        })
}

/// `path` made absolute and normalised, relative to the filesystem root.
fn from_root(path: &Utf8Path, label: &str) -> Result<Utf8PathBuf, TriageError> {
    let absolute = if path.is_absolute() {
        normalise(path)
    } else {
        normalise(&current_dir(label)?.join(path))
    };
    absolute
        .strip_prefix("/")
        .map(Utf8Path::to_path_buf)
        .map_err(|_| TriageError::Io {
            message: format!("failed to normalise {label} path '{path}'"),
        })
}

/// Removes `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut resolved = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_str()),
        }
    }
    resolved
}

fn current_dir(label: &str) -> Result<Utf8PathBuf, TriageError> {
    let current = env::current_dir().map_err(|error| TriageError::Io {
        message: format!("failed to resolve {label} directory: {error}"),
    })?;
    Utf8PathBuf::from_path_buf(current).map_err(|raw| TriageError::Io {
        message: format!(
            "failed to resolve {label} directory: '{}' is not UTF-8",
            raw.display()
        ),
    })
}

/// Serialises `value` as JSON and replaces `file_name` inside `dir`.
pub(crate) fn write_json<T: serde::Serialize>(
    dir: &Dir,
    file_name: &str,
    value: &T,
) -> Result<(), TriageError> {
    let json = serde_json::to_string_pretty(value).map_err(|error| TriageError::Io {
        message: format!("failed to serialise '{file_name}': {error}"),
    })?;
    dir.write(file_name, json).map_err(|error| TriageError::Io {
        message: format!("failed to write '{file_name}': {error}"),
    })
}

fn open_ambient(path: &str, label: &str) -> Result<Dir, TriageError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|error| TriageError::Io {
        message: format!("failed to open {label} anchor directory '{path}': {error}"),
    })
}
