// File: src/persistence.rs
use crate::core::engine::NptEngine;
use crate::core::stats::StatisticsReporter;
use crate::core::trie::TrieStore;
use crate::error::{NptError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The complete in-memory state, tombstoned paths included.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct SerializableState {
    trie: TrieStore,
    reporter: StatisticsReporter,
}

/// Mode given to files that did not exist before the first write.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Writes through a temp file beside the target, then renames it over the
/// target. A symlinked `path` is written through to the file it points at,
/// and an existing file keeps its permissions.
fn write_atomically(path: &Path, write: impl FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e.into()),
    };
    let parent_dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    match fs::metadata(&target) {
        Ok(existing) => temp_file.as_file().set_permissions(existing.permissions())?,
        #[cfg(unix)]
        Err(e) if e.kind() == ErrorKind::NotFound => {
            use std::os::unix::fs::PermissionsExt;
            temp_file.as_file().set_permissions(fs::Permissions::from_mode(NEW_FILE_MODE))?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    temp_file.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Writes the rendered dump verbatim, replacing whatever `path` held.
pub fn export_dump(trie: &TrieStore, path: &Path) -> Result<()> {
    let text = trie.render_dump();
    write_atomically(path, |writer| Ok(writer.write_all(text.as_bytes())?))?;
    tracing::info!(path = %path.display(), names = trie.len(), "exported dump");
    Ok(())
}

/// Parses one `<prefix> (<name>)` line. The prefix always equals the name,
/// which lets names containing spaces or parentheses parse unambiguously.
pub fn parse_dump_line(line: &str) -> Option<&str> {
    let half = line.len().checked_sub(3)?;
    if half % 2 != 0 {
        return None;
    }
    let half = half / 2;
    if !line.is_char_boundary(half) {
        return None;
    }
    let (prefix, rest) = line.split_at(half);
    let name = rest.strip_prefix(" (")?.strip_suffix(')')?;
    (name == prefix).then_some(name)
}

/// Rebuilds a store from dump text. Malformed lines are skipped.
pub fn parse_dump(text: &str) -> TrieStore {
    let mut trie = TrieStore::new();
    for (number, line) in text.lines().enumerate() {
        match parse_dump_line(line) {
            Some(name) => trie.insert(name),
            None if line.is_empty() => {}
            None => tracing::warn!(line = number + 1, "skipping malformed dump line"),
        }
    }
    trie
}

/// Imports a dump written by [`export_dump`]. A missing file is an empty store.
pub fn import_dump(path: &Path) -> Result<TrieStore> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let trie = parse_dump(&text);
            tracing::info!(path = %path.display(), names = trie.len(), "imported dump");
            Ok(trie)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no dump to import");
            Ok(TrieStore::new())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn save_snapshot(engine: &NptEngine, path: &Path) -> Result<()> {
    let state = SerializableState {
        trie: engine.trie.clone(),
        reporter: engine.reporter.clone(),
    };
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, &state)?))?;
    tracing::info!(path = %path.display(), nodes = state.trie.node_count(), "saved snapshot");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<NptEngine> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: SerializableState = bincode::deserialize_from(reader)?;
    if !state.trie.validate() {
        return Err(NptError::InvalidSnapshot(path.display().to_string()));
    }

    let mut engine = NptEngine::new();
    engine.trie = state.trie;
    engine.reporter = state.reporter;
    tracing::info!(path = %path.display(), names = engine.trie.len(), "loaded snapshot");
    Ok(engine)
}
