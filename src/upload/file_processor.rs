use crate::config::IngestConfig;
use crate::error::{Result, UploaderError};
use crate::upload::types::{FileRef, FileSource};
use glob::Pattern;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

impl FileRef {
    /// Reference a file on disk. Only its metadata is read.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path).map_err(|source| UploaderError::File {
            path: path.clone(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, metadata.len(), FileSource::Path(path)))
    }
}

/// Turns user selections (picked files, picked or dropped folders, CLI
/// arguments) into file references ready to enqueue.
#[derive(Debug, Clone)]
pub struct FileProcessor {
    exclude: Vec<Pattern>,
    respect_gitignore: bool,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }
}

impl FileProcessor {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let exclude = config
            .exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            exclude,
            respect_gitignore: config.respect_gitignore,
        })
    }

    /// Files are taken as they are; folders are expanded. Paths that cannot
    /// be read are logged and skipped, in the order they were given.
    pub fn collect<I, P>(&self, paths: I) -> Vec<FileRef>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                files.extend(self.walk_folder(path));
                continue;
            }
            match FileRef::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!("skipping selection: {}", e),
            }
        }
        files
    }

    /// Every regular file below `folder`, minus hidden, gitignored and
    /// excluded entries. Unreadable entries are logged and skipped.
    pub fn walk_folder(&self, folder: &Path) -> Vec<FileRef> {
        let walker = WalkBuilder::new(folder)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping entry in {}: {}", folder.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().map_or(false, |t| t.is_file()) || self.is_excluded(folder, path)
            {
                continue;
            }
            match FileRef::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!("{}", e),
            }
        }
        tracing::debug!("found {} files in {}", files.len(), folder.display());
        files
    }

    fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let file_name = path.file_name().map(Path::new);
        self.exclude.iter().any(|pattern| {
            pattern.matches_path(relative) || file_name.map_or(false, |n| pattern.matches_path(n))
        })
    }
}
