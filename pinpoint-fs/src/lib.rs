//! Capability-based file helpers for Pinpoint's file-backed state.
//!
//! Paths are UTF-8 (`camino`) and every access goes through a `cap-std`
//! directory handle opened from ambient authority.
#![forbid(unsafe_code)]

use std::{
    fmt,
    fs::File,
    io::{self, Write},
    path::{Component, MAIN_SEPARATOR},
};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::OpenOptions, fs_utf8::Dir};
use fd_lock::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Create every missing directory above `path`.
///
/// Absolute and relative paths are both accepted; a bare file name needs no
/// work.
///
/// # Errors
///
/// Returns any I/O error raised while opening the base directory or creating
/// the missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Read `path` as UTF-8 text, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns I/O errors other than [`io::ErrorKind::NotFound`], including
/// invalid UTF-8 content.
pub fn read_optional(path: &Utf8Path) -> io::Result<Option<String>> {
    let (dir, name) = match open_parent(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    match dir.read_to_string(&name) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replace the contents of `path` without exposing a partial file.
///
/// The bytes go to a hidden sibling first, are flushed to disk and then
/// renamed over the target. Missing parent directories are created.
///
/// # Errors
///
/// Returns any I/O error raised while writing, syncing or renaming.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent(path)?;
    let staging = format!(".{name}.tmp");
    let mut file = dir.create(&staging)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    dir.rename(&staging, &dir, &name)
}

/// Advisory lock coordinating every process that shares one state file.
///
/// [`write_atomic`] renames a fresh file over the target, so the lock lives
/// on a hidden sibling (`.{name}.lock`) that is never replaced. Locks are
/// advisory: only holders of a `StateLock` for the same path are excluded.
pub struct StateLock {
    path: Utf8PathBuf,
    file: RwLock<File>,
}

impl StateLock {
    /// Open, creating when absent, the lock file guarding `path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while creating the directories or the
    /// lock file.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        ensure_parent_dir(path)?;
        let (dir, name) = open_parent(path)?;
        let lock_name = format!(".{name}.lock");
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        let file = dir.open_with(&lock_name, &options)?;
        Ok(Self {
            path: path.with_file_name(lock_name),
            file: RwLock::new(file.into_std()),
        })
    }

    /// Location of the lock file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Block until no other holder has exclusive access.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by the operating system.
    pub fn shared(&self) -> io::Result<RwLockReadGuard<'_, File>> {
        self.file.read()
    }

    /// Block until every other holder has released the lock.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by the operating system.
    pub fn exclusive(&mut self) -> io::Result<RwLockWriteGuard<'_, File>> {
        self.file.write()
    }
}

impl fmt::Debug for StateLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateLock")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Open the directory holding `path` and return it with the file name.
fn open_parent(path: &Utf8Path) -> io::Result<(Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `parent` into an ambient base directory and the path below it.
///
/// `cap-std` refuses absolute paths relative to a directory handle, so the
/// root (or Windows prefix) is opened ambiently and the rest stays relative.
fn split_base(parent: &Utf8Path) -> io::Result<(Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Some(Utf8PathBuf::from(format!("{drive}{MAIN_SEPARATOR}")))
        }
        Some(Component::RootDir) => Some(Utf8PathBuf::from(MAIN_SEPARATOR.to_string())),
        _ => None,
    };
    let Some(root) = base else {
        let dir = Dir::open_ambient_dir(".", ambient_authority())?;
        return Ok((dir, parent.to_path_buf()));
    };
    let relative = parent
        .strip_prefix(&root)
        .map_err(|_| io::Error::other(format!("{parent} is not below {root}")))?
        .to_path_buf();
    let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok((dir, relative))
}
