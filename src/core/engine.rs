use crate::config::Config;
use crate::core::stats::{LetterWeights, ProbabilityVector, StatisticsReporter};
use crate::core::trie::TrieStore;
use crate::core::types::DeleteOutcome;
use crate::error::{NptError, Result};
use crate::persistence::{export_dump, import_dump, load_snapshot};
use std::path::{Path, PathBuf};

/// A request from a transport shell, keyed by the menu's numeric choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Insert(String),
    Lookup(String),
    Delete(String),
    Dump,
    LetterWeights,
    AverageProbability,
    Save,
    Shutdown,
}

impl Operation {
    /// Maps choices 1..=8 to operations. Choices 1-3 require a name.
    pub fn from_choice(choice: i64, name: Option<String>) -> Result<Self> {
        let named = |name: Option<String>| name.ok_or(NptError::MissingName(choice));
        Ok(match choice {
            1 => Operation::Insert(named(name)?),
            2 => Operation::Lookup(named(name)?),
            3 => Operation::Delete(named(name)?),
            4 => Operation::Dump,
            5 => Operation::LetterWeights,
            6 => Operation::AverageProbability,
            7 => Operation::Save,
            8 => Operation::Shutdown,
            other => return Err(NptError::InvalidChoice(other)),
        })
    }
}

/// What a shell should do with an executed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    /// The dump, kept apart so shells can choose how to present it.
    Dump(String),
    /// Answer, then stop accepting requests. Nothing is flushed.
    Shutdown(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Output(text) | Reply::Dump(text) | Reply::Shutdown(text) => text,
        }
    }
}

/// Owns the name store and its statistics for the lifetime of a shell.
pub struct NptEngine {
    pub trie: TrieStore,
    pub reporter: StatisticsReporter,
    dump_path: Option<PathBuf>,
}

impl Default for NptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NptEngine {
    pub fn new() -> Self {
        Self {
            trie: TrieStore::new(),
            reporter: StatisticsReporter::default(),
            dump_path: None,
        }
    }

    /// Builds an engine from config, importing the dump file when asked to.
    pub fn from_config(config: &Config) -> Result<Self> {
        let probabilities = ProbabilityVector::filled(config.statistics.initial_probability);
        let trie = if config.storage.load_on_start {
            import_dump(&config.storage.dump_path)?
        } else {
            TrieStore::new()
        };
        Ok(Self {
            trie,
            reporter: StatisticsReporter::new(probabilities),
            dump_path: Some(config.storage.dump_path.clone()),
        })
    }

    /// Startup entry point for shells. With `load_on_start` off the store
    /// starts empty. Otherwise an existing snapshot wins over the dump file;
    /// the snapshot carries its own probability vector, so
    /// `initial_probability` only applies when no snapshot is loaded.
    pub fn open(config: &Config) -> Result<Self> {
        if config.storage.load_on_start {
            if let Some(snapshot) = &config.storage.snapshot_path {
                if snapshot.exists() {
                    tracing::info!(path = %snapshot.display(), "loading snapshot instead of dump");
                    let engine = load_snapshot(snapshot)?;
                    return Ok(engine.with_dump_path(config.storage.dump_path.clone()));
                }
            }
        }
        Self::from_config(config)
    }

    pub fn with_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_path = Some(path.into());
        self
    }

    pub fn dump_path(&self) -> Option<&Path> {
        self.dump_path.as_deref()
    }

    pub fn insert_name(&mut self, name: &str) -> String {
        self.trie.insert(name);
        tracing::debug!(name, "inserted");
        format!("Name '{}' inserted successfully.", name)
    }

    pub fn lookup_name(&self, name: &str) -> String {
        let found = self.trie.lookup(name);
        tracing::debug!(name, found, "lookup");
        format!("Name '{}' {}.", name, if found { "found" } else { "not found" })
    }

    pub fn delete_name(&mut self, name: &str) -> DeleteOutcome {
        let outcome = self.trie.delete(name);
        tracing::debug!(name, deleted = outcome.is_deleted(), "delete");
        outcome
    }

    pub fn dump_text(&self) -> String {
        self.trie.render_dump()
    }

    pub fn letter_weights(&self) -> LetterWeights {
        self.reporter.letter_weights(&self.trie)
    }

    pub fn average_report(&self) -> String {
        format!("Average Access Probability: {:.2}", self.reporter.average_probability())
    }

    /// Exports the current dump to `path`, overwriting it.
    pub fn persist_dump_to_file(&self, path: &Path) -> Result<()> {
        export_dump(&self.trie, path)
    }

    /// Exports to the configured dump path. Without one there is nowhere to
    /// write, which is reported as an I/O error rather than skipped.
    pub fn save_dump(&self) -> Result<()> {
        match &self.dump_path {
            Some(path) => self.persist_dump_to_file(path),
            None => Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no dump path configured").into()),
        }
    }

    pub fn execute(&mut self, operation: Operation) -> Result<Reply> {
        Ok(match operation {
            Operation::Insert(name) => Reply::Output(self.insert_name(&name)),
            Operation::Lookup(name) => Reply::Output(self.lookup_name(&name)),
            Operation::Delete(name) => Reply::Output(self.delete_name(&name).to_string()),
            Operation::Dump => Reply::Dump(self.dump_text()),
            Operation::LetterWeights => Reply::Output(self.letter_weights().to_string()),
            Operation::AverageProbability => Reply::Output(self.average_report()),
            Operation::Save => {
                self.save_dump()?;
                Reply::Output("Name Prefix Tree (NPT) saved to file successfully.".to_string())
            }
            Operation::Shutdown => {
                tracing::info!(names = self.trie.len(), "shutdown requested");
                Reply::Shutdown("Server is shutting down.".to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &mut NptEngine, choice: i64, name: Option<&str>) -> Reply {
        let op = Operation::from_choice(choice, name.map(str::to_string)).unwrap();
        engine.execute(op).unwrap()
    }

    #[test]
    fn menu_choices_produce_messages() {
        let mut engine = NptEngine::new();
        assert_eq!(run(&mut engine, 1, Some("ann")).text(), "Name 'ann' inserted successfully.");
        assert_eq!(run(&mut engine, 2, Some("ann")).text(), "Name 'ann' found.");
        assert_eq!(run(&mut engine, 2, Some("an")).text(), "Name 'an' not found.");
        assert_eq!(run(&mut engine, 4, None), Reply::Dump("ann (ann)".to_string()));
        assert_eq!(run(&mut engine, 5, None).text(), "Access Probabilities:\na: 0.10\nn: 0.20");
        assert_eq!(run(&mut engine, 6, None).text(), "Average Access Probability: 0.50");
        assert_eq!(run(&mut engine, 3, Some("ann")).text(), "Name 'ann' deleted successfully.");
        assert_eq!(run(&mut engine, 3, Some("ann")).text(), "Name 'ann' not found for deletion.");
        assert!(matches!(run(&mut engine, 8, None), Reply::Shutdown(_)));
    }

    #[test]
    fn bad_choices_are_rejected() {
        assert!(matches!(Operation::from_choice(0, None), Err(NptError::InvalidChoice(0))));
        assert!(matches!(Operation::from_choice(9, Some("x".into())), Err(NptError::InvalidChoice(9))));
        assert!(matches!(Operation::from_choice(1, None), Err(NptError::MissingName(1))));
        assert_eq!(Operation::from_choice(4, Some("ignored".into())).unwrap(), Operation::Dump);
    }

    #[test]
    fn save_without_path_is_an_error() {
        let mut engine = NptEngine::new();
        assert!(engine.execute(Operation::Save).is_err());
    }

    #[test]
    fn save_writes_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("npt_output.txt");
        let mut engine = NptEngine::new().with_dump_path(&path);
        engine.insert_name("an");
        engine.insert_name("and");
        let reply = engine.execute(Operation::Save).unwrap();
        assert_eq!(reply.text(), "Name Prefix Tree (NPT) saved to file successfully.");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), engine.dump_text());
    }

    #[test]
    fn open_prefers_snapshot_unless_starting_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("state.bin");
        let dump = dir.path().join("names.txt");
        std::fs::write(&dump, "dump (dump)").unwrap();

        let mut saved = NptEngine::new();
        saved.insert_name("snap");
        saved.reporter.probabilities.set('a', 1.0);
        crate::persistence::save_snapshot(&saved, &snapshot).unwrap();

        let mut config = Config::default();
        config.storage.dump_path = dump.clone();
        config.storage.snapshot_path = Some(snapshot);

        let engine = NptEngine::open(&config).unwrap();
        assert_eq!(engine.dump_text(), "snap (snap)");
        assert_eq!(engine.reporter.probabilities.get('a'), Some(1.0));
        assert_eq!(engine.dump_path(), Some(dump.as_path()));

        config.storage.load_on_start = false;
        let engine = NptEngine::open(&config).unwrap();
        assert!(engine.trie.is_empty());
        assert_eq!(engine.dump_path(), Some(dump.as_path()));
    }

    #[test]
    fn open_without_snapshot_imports_dump() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("names.txt");
        std::fs::write(&dump, "dump (dump)").unwrap();

        let mut config = Config::default();
        config.storage.dump_path = dump;
        config.storage.snapshot_path = Some(dir.path().join("absent.bin"));
        assert_eq!(NptEngine::open(&config).unwrap().dump_text(), "dump (dump)");
    }

    #[test]
    fn config_sets_probabilities_and_loads_dump() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("names.txt");
        std::fs::write(&dump, "an (an)\nant (ant)").unwrap();

        let mut config = Config::default();
        config.storage.dump_path = dump.clone();
        config.statistics.initial_probability = 0.25;
        let engine = NptEngine::from_config(&config).unwrap();
        assert!(engine.trie.lookup("ant"));
        assert_eq!(engine.average_report(), "Average Access Probability: 0.25");
        assert_eq!(engine.dump_path(), Some(dump.as_path()));

        config.storage.load_on_start = false;
        assert!(NptEngine::from_config(&config).unwrap().trie.is_empty());
    }
}
