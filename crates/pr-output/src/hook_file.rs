//! `FileHookSink`: one `<hook>.log` file per enabled hook.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use pr_core::{Hook, HookSet, HookSink};

use crate::{OutputError, OutputResult};

/// Writes every enabled hook to `<folder>/<hook name>.log`.
///
/// Each file starts with the hook's header row, when it has one.  Write
/// failures cannot surface through [`HookSink`]; the first one is kept and
/// returned by [`finish`][Self::finish].
pub struct FileHookSink {
    folder: PathBuf,
    hooks:  HookSet,
    files:  BTreeMap<Hook, BufWriter<File>>,
    error:  Option<OutputError>,
}

impl FileHookSink {
    /// Create `folder` if needed and open a file for each hook in `hooks`.
    pub fn create(folder: impl AsRef<Path>, hooks: HookSet) -> OutputResult<Self> {
        let folder = folder.as_ref().to_path_buf();
        fs::create_dir_all(&folder)
            .map_err(|source| OutputError::Create { path: folder.clone(), source })?;

        let mut files = BTreeMap::new();
        for hook in hooks.iter() {
            let path = hook_path(&folder, hook);
            let file = File::create(&path).map_err(|source| OutputError::Create { path, source })?;
            let mut out = BufWriter::new(file);
            if let Some(header) = hook.header() {
                writeln!(out, "{header}").map_err(|source| OutputError::Hook { hook, source })?;
            }
            files.insert(hook, out);
        }
        info!("writing {} hooks to {}", files.len(), folder.display());
        Ok(Self { folder, hooks, files, error: None })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Where `hook` is written, enabled or not.
    pub fn path(&self, hook: Hook) -> PathBuf {
        hook_path(&self.folder, hook)
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.error.take()
    }

    /// Flush every file.  Returns the first error seen during the run, or
    /// the first flush failure.
    pub fn finish(mut self) -> OutputResult<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        for (hook, out) in &mut self.files {
            out.flush().map_err(|source| OutputError::Hook { hook: *hook, source })?;
        }
        Ok(())
    }
}

fn hook_path(folder: &Path, hook: Hook) -> PathBuf {
    folder.join(format!("{}.log", hook.name()))
}

impl HookSink for FileHookSink {
    #[inline]
    fn is_enabled(&self, hook: Hook) -> bool {
        self.hooks.contains(hook)
    }

    fn write_to_hook(&mut self, hook: Hook, text: &str) {
        let Some(out) = self.files.get_mut(&hook) else { return };
        if let Err(source) = writeln!(out, "{text}") {
            if self.error.is_none() {
                warn!("hook {hook} write failed: {source}");
                self.error = Some(OutputError::Hook { hook, source });
            }
        }
    }
}
