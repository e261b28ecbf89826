//! Directory traversal producing one image store per visited directory.
//!
//! Traversal is depth-first over an explicit work stack. All of the first
//! base folder's tree is visited before the second base folder's. Within a
//! directory, its own files form the run and its subdirectories are queued
//! for later. Sibling order follows the directory listing and is not sorted.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use regex::Regex;

use crate::codec::ImageCodec;
use crate::error::CrawlError;
use crate::models::{MemoryStrategy, PendingDirectory, Run};
use crate::services::image_store::{create_store, ImageStore};

/// Number of disambiguated destination names tried (`00` to `99`)
pub const MAX_NAME_ATTEMPTS: usize = 100;

/// Name used for a base folder whose canonical path has no final component
const ROOT_FOLDER_NAME: &str = "root";

/// How the crawler selects directories and files and where output goes
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    prefix: String,
    name_filter: Regex,
    include_prefixed: bool,
    recursive: bool,
    memory: MemoryStrategy,
    output_root: Option<PathBuf>,
}

impl CrawlOptions {
    /// `fname_regex` must match a whole file name to select it
    pub fn new(prefix: impl Into<String>, fname_regex: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            prefix: prefix.into(),
            name_filter: Regex::new(&format!("^(?:{fname_regex})$"))?,
            include_prefixed: false,
            recursive: false,
            memory: MemoryStrategy::default(),
            output_root: None,
        })
    }

    pub fn include_prefixed(mut self, include: bool) -> Self {
        self.include_prefixed = include;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn memory(mut self, memory: MemoryStrategy) -> Self {
        self.memory = memory;
        self
    }

    pub fn output_root(mut self, output_root: Option<PathBuf>) -> Self {
        self.output_root = output_root;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `file_name` is selected as an image
    pub fn matches_file(&self, file_name: &str) -> bool {
        self.name_filter.is_match(file_name)
    }

    /// Whether a subdirectory named `dir_name` is queued for a visit
    pub fn descends_into(&self, dir_name: &str) -> bool {
        self.recursive && (self.include_prefixed || !dir_name.starts_with(&self.prefix))
    }
}

/// Turns base folders into a sequence of runs
pub struct FolderCrawler {
    bases: Vec<PathBuf>,
    options: CrawlOptions,
    codec: Arc<dyn ImageCodec>,
    stack: Vec<PendingDirectory>,
}

impl FolderCrawler {
    pub fn new(bases: Vec<PathBuf>, options: CrawlOptions, codec: Arc<dyn ImageCodec>) -> Self {
        let stack = (0..bases.len()).rev().map(PendingDirectory::base).collect();
        Self {
            bases,
            options,
            codec,
            stack,
        }
    }

    /// True while unvisited directories remain
    pub fn has_next_run(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Visit the next pending directory.
    ///
    /// Returns `None` once traversal is complete. An error only affects the
    /// directory it was raised for; the crawler can be advanced further.
    pub fn next_run(&mut self) -> Option<Result<Box<dyn ImageStore>, CrawlError>> {
        let pending = self.stack.pop()?;
        Some(self.visit(pending))
    }

    fn visit(&mut self, pending: PendingDirectory) -> Result<Box<dyn ImageStore>, CrawlError> {
        let base = &self.bases[pending.base_index];
        let origin = base.join(&pending.relative);
        if !origin.is_dir() {
            return Err(CrawlError::DirectoryNotFound(origin));
        }

        let read_dir_error = |source| CrawlError::ReadDir {
            path: origin.clone(),
            source,
        };
        let mut images = Vec::new();
        for entry in fs::read_dir(&origin).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if path.is_dir() {
                if self.options.descends_into(&name) {
                    self.stack.push(pending.child(&name));
                } else {
                    tracing::trace!(path = %path.display(), "Skipping folder");
                }
            } else if path.is_file() && self.options.matches_file(&name) {
                images.push(path);
            }
        }

        let destination = match &self.options.output_root {
            Some(root) => root.join(canonical_name(base)?).join(&pending.relative),
            None => find_subfolder_destination(&origin, &self.options.prefix)?,
        };

        let run = Run::new(
            normalize_lexically(&origin),
            normalize_lexically(&destination),
            images,
        );
        tracing::debug!(
            origin = %run.origin().display(),
            destination = %run.destination().display(),
            images = run.len(),
            "Found run"
        );
        Ok(create_store(self.options.memory, run, Arc::clone(&self.codec)))
    }
}

impl Iterator for FolderCrawler {
    type Item = Result<Box<dyn ImageStore>, CrawlError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_run()
    }
}

/// Final component of the canonical form of `path`
fn canonical_name(path: &Path) -> Result<String, CrawlError> {
    let canonical = fs::canonicalize(path).map_err(|source| CrawlError::Canonicalize {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ROOT_FOLDER_NAME.to_string()))
}

/// First free output folder name inside `origin`.
///
/// Tries `{prefix}_{name}`, then `{prefix}00_{name}` up to `{prefix}99_{name}`,
/// where `name` is the canonical folder name of `origin`.
pub fn find_subfolder_destination(origin: &Path, prefix: &str) -> Result<PathBuf, CrawlError> {
    let name = canonical_name(origin)?;

    let plain = origin.join(format!("{prefix}_{name}"));
    if !plain.exists() {
        return Ok(plain);
    }

    (0..MAX_NAME_ATTEMPTS)
        .map(|i| origin.join(format!("{prefix}{i:02}_{name}")))
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| CrawlError::NamingExhausted {
            origin: origin.to_path_buf(),
        })
}

/// Resolve `.` and `..` segments without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
