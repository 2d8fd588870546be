use crate::model::GraphError;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteFile {
    pub path: PathBuf,
    /// File name without the `.md` extension.
    pub basename: String,
}

/// Read access to the notes of a vault.
pub trait NoteStore {
    fn list_note_files(&self) -> Vec<NoteFile>;
    fn read_file(&self, file: &NoteFile) -> Result<String, GraphError>;
}

/// A directory tree of Markdown notes on disk.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsVault { root: root.into() }
    }

    fn modified(&self, file: &NoteFile) -> Option<SystemTime> {
        fs::metadata(&file.path).and_then(|m| m.modified()).ok()
    }
}

impl NoteStore for FsVault {
    fn list_note_files(&self) -> Vec<NoteFile> {
        let mut files: Vec<NoteFile> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| note_file(e.path()))
            .collect();
        files.sort();
        files
    }

    fn read_file(&self, file: &NoteFile) -> Result<String, GraphError> {
        fs::read_to_string(&file.path).map_err(|source| GraphError::Io {
            path: file.path.clone(),
            source,
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn note_file(path: &Path) -> Option<NoteFile> {
    if path.extension().map_or(true, |ext| ext != "md") {
        return None;
    }
    let basename = path.file_stem()?.to_str()?.to_string();
    Some(NoteFile {
        path: path.to_path_buf(),
        basename,
    })
}

/// Reads every note, skipping (and logging) the ones that fail.
pub fn read_all<S: NoteStore + ?Sized>(store: &S) -> Vec<(NoteFile, String)> {
    store
        .list_note_files()
        .into_iter()
        .filter_map(|file| match store.read_file(&file) {
            Ok(content) => Some((file, content)),
            Err(err) => {
                warn!("skipping unreadable note: {}", err);
                None
            }
        })
        .collect()
}

/// Detects notes created or modified since the previous poll by comparing
/// modification times.
#[derive(Debug, Default)]
pub struct ChangeWatcher {
    seen: HashMap<PathBuf, Option<SystemTime>>,
}

impl ChangeWatcher {
    /// Starts from the vault's current state so existing notes are not
    /// reported as new.
    pub fn snapshot(vault: &FsVault) -> Self {
        let seen = vault
            .list_note_files()
            .into_iter()
            .map(|file| {
                let modified = vault.modified(&file);
                (file.path, modified)
            })
            .collect();
        ChangeWatcher { seen }
    }

    /// Number of create/modify events since the last call.
    pub fn poll(&mut self, vault: &FsVault) -> usize {
        let mut events = 0;
        let mut listed = HashSet::new();
        for file in vault.list_note_files() {
            let modified = vault.modified(&file);
            match self.seen.get(&file.path) {
                Some(previous) if *previous == modified => {}
                Some(_) => {
                    debug!("note modified: {}", file.path.display());
                    events += 1;
                }
                None => {
                    debug!("note created: {}", file.path.display());
                    events += 1;
                }
            }
            listed.insert(file.path.clone());
            self.seen.insert(file.path, modified);
        }
        self.seen.retain(|path, _| listed.contains(path));
        events
    }
}
