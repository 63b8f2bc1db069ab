//! Beads repository: the structured metadata store behind beads mode.
//!
//! `BeadsRepository` is the seam the stores talk to. The bundled
//! `JsonlBeadsRepository` keeps beads in memory and, when opened on a
//! project, mirrors them to `.beads/issues.jsonl` (one bead per line).

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, StoreError};
use crate::types::now_rfc3339;

pub const DEFAULT_ID_PREFIX: &str = "bd";
const BEADS_DIR: &str = ".beads";
const ISSUES_FILE: &str = "issues.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeadKind {
    Epic,
    Task,
    Plan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bead {
    pub id: String,
    pub kind: BeadKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub status: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Bead {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Input for [`BeadsRepository::create`].
#[derive(Debug, Clone)]
pub struct NewBead {
    pub kind: BeadKind,
    pub title: String,
    pub parent: Option<String>,
    pub status: String,
    pub body: String,
    pub metadata: BTreeMap<String, String>,
}

impl NewBead {
    pub fn new(kind: BeadKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            parent: None,
            status: "open".to_string(),
            body: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Partial update. Metadata entries are merged key by key.
#[derive(Debug, Clone, Default)]
pub struct BeadUpdate {
    pub title: Option<String>,
    pub status: Option<String>,
    pub body: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl BeadUpdate {
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct BeadFilter {
    pub kind: Option<BeadKind>,
    pub parent: Option<String>,
    pub title: Option<String>,
}

impl BeadFilter {
    pub fn kind(kind: BeadKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn matches(&self, bead: &Bead) -> bool {
        self.kind.map_or(true, |k| bead.kind == k)
            && self
                .parent
                .as_deref()
                .map_or(true, |p| bead.parent.as_deref() == Some(p))
            && self.title.as_deref().map_or(true, |t| bead.title == t)
    }
}

/// Structured metadata store for a project.
///
/// Methods take `&self`; implementations synchronize internally so the
/// same handle can be lent to several stores at once.
pub trait BeadsRepository {
    /// Fresh identifier `{prefix}-{suffix}`, never handed out twice by this handle.
    fn generate_id(&self, prefix: &str) -> String;

    fn create(&self, bead: NewBead) -> Result<Bead>;

    fn get(&self, id: &str) -> Result<Option<Bead>>;

    fn update(&self, id: &str, update: BeadUpdate) -> Result<Bead>;

    /// Matching beads in creation order.
    fn list(&self, filter: &BeadFilter) -> Result<Vec<Bead>>;
}

#[derive(Debug, Default)]
struct RepoState {
    beads: Vec<Bead>,
    issued: HashSet<String>,
    seq: u64,
}

impl RepoState {
    fn next_id(&mut self, prefix: &str) -> String {
        loop {
            self.seq += 1;
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            let mut hasher = Sha256::new();
            hasher.update(prefix.as_bytes());
            hasher.update(self.seq.to_le_bytes());
            hasher.update(nanos.to_le_bytes());
            let digest = hex::encode(hasher.finalize());
            let id = format!("{}-{}", prefix, &digest[..6]);
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// JSONL-backed beads repository.
#[derive(Debug)]
pub struct JsonlBeadsRepository {
    path: Option<PathBuf>,
    state: Mutex<RepoState>,
}

impl JsonlBeadsRepository {
    /// Repository without persistence.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(RepoState::default()),
        }
    }

    /// Open (or start) `<project_root>/.beads/issues.jsonl`.
    pub fn open(project_root: &Path) -> Result<Self> {
        let path = project_root.join(BEADS_DIR).join(ISSUES_FILE);
        let beads = if path.exists() {
            read_beads(&path)?
        } else {
            Vec::new()
        };
        tracing::debug!(path = %path.display(), count = beads.len(), "Opened beads repository");
        let issued = beads.iter().map(|b| b.id.clone()).collect();
        let seq = beads.len() as u64;
        Ok(Self {
            path: Some(path),
            state: Mutex::new(RepoState { beads, issued, seq }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, RepoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, beads: &[Bead]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for bead in beads {
            out.push_str(&serde_json::to_string(bead)?);
            out.push('\n');
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}

fn read_beads(path: &Path) -> Result<Vec<Bead>> {
    let content = std::fs::read_to_string(path)?;
    let mut beads = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bead: Bead = serde_json::from_str(line).map_err(|e| {
            StoreError::Repository(format!("{}:{}: {}", path.display(), lineno + 1, e))
        })?;
        beads.push(bead);
    }
    Ok(beads)
}

impl BeadsRepository for JsonlBeadsRepository {
    fn generate_id(&self, prefix: &str) -> String {
        self.lock().next_id(prefix)
    }

    fn create(&self, new: NewBead) -> Result<Bead> {
        let mut state = self.lock();
        let now = now_rfc3339();
        let bead = Bead {
            id: state.next_id(DEFAULT_ID_PREFIX),
            kind: new.kind,
            title: new.title,
            parent: new.parent,
            status: new.status,
            body: new.body,
            metadata: new.metadata,
            created_at: now.clone(),
            updated_at: now,
        };
        let mut beads = state.beads.clone();
        beads.push(bead.clone());
        self.persist(&beads)?;
        state.beads = beads;
        Ok(bead)
    }

    fn get(&self, id: &str) -> Result<Option<Bead>> {
        Ok(self.lock().beads.iter().find(|b| b.id == id).cloned())
    }

    fn update(&self, id: &str, update: BeadUpdate) -> Result<Bead> {
        let mut state = self.lock();
        // Mutate a copy; the in-memory state only changes once the file write succeeds.
        let mut beads = state.beads.clone();
        let bead = beads
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::BeadNotFound(id.to_string()))?;
        if let Some(title) = update.title {
            bead.title = title;
        }
        if let Some(status) = update.status {
            bead.status = status;
        }
        if let Some(body) = update.body {
            bead.body = body;
        }
        bead.metadata.extend(update.metadata);
        bead.updated_at = now_rfc3339();
        let updated = bead.clone();
        self.persist(&beads)?;
        state.beads = beads;
        Ok(updated)
    }

    fn list(&self, filter: &BeadFilter) -> Result<Vec<Bead>> {
        Ok(self
            .lock()
            .beads
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }
}

/// Repository opened on first use.
///
/// Commands that never touch beads (filesystem mode, except id generation)
/// must not fail because `issues.jsonl` is unreadable. A failed open is
/// remembered and returned from every data call; ids then come from a
/// fresh in-memory sequence.
#[derive(Debug)]
pub struct LazyBeadsRepository {
    project_root: PathBuf,
    opened: OnceLock<Opened>,
}

#[derive(Debug)]
struct Opened {
    repo: JsonlBeadsRepository,
    error: Option<String>,
}

impl LazyBeadsRepository {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            opened: OnceLock::new(),
        }
    }

    fn opened(&self) -> &Opened {
        self.opened.get_or_init(|| match JsonlBeadsRepository::open(&self.project_root) {
            Ok(repo) => Opened { repo, error: None },
            Err(e) => {
                let message = match e {
                    StoreError::Repository(m) => m,
                    other => format!("{}: {}", self.project_root.join(BEADS_DIR).display(), other),
                };
                tracing::warn!(error = %message, "Beads repository unavailable");
                Opened {
                    repo: JsonlBeadsRepository::in_memory(),
                    error: Some(message),
                }
            }
        })
    }

    fn repo(&self) -> Result<&JsonlBeadsRepository> {
        let opened = self.opened();
        match &opened.error {
            Some(message) => Err(StoreError::Repository(message.clone())),
            None => Ok(&opened.repo),
        }
    }
}

impl BeadsRepository for LazyBeadsRepository {
    fn generate_id(&self, prefix: &str) -> String {
        self.opened().repo.generate_id(prefix)
    }

    fn create(&self, bead: NewBead) -> Result<Bead> {
        self.repo()?.create(bead)
    }

    fn get(&self, id: &str) -> Result<Option<Bead>> {
        self.repo()?.get(id)
    }

    fn update(&self, id: &str, update: BeadUpdate) -> Result<Bead> {
        self.repo()?.update(id, update)
    }

    fn list(&self, filter: &BeadFilter) -> Result<Vec<Bead>> {
        self.repo()?.list(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_unique_with_prefix() {
        let repo = JsonlBeadsRepository::in_memory();
        let ids: HashSet<String> = (0..200).map(|_| repo.generate_id("task")).collect();
        assert_eq!(ids.len(), 200);
        for id in &ids {
            assert!(id.starts_with("task-"));
            assert_eq!(id.len(), "task-".len() + 6);
        }
    }

    #[test]
    fn test_create_get_update_list() {
        let repo = JsonlBeadsRepository::in_memory();
        let epic = repo.create(NewBead::new(BeadKind::Epic, "auth")).unwrap();
        assert!(epic.id.starts_with("bd-"));
        let task = repo
            .create(
                NewBead::new(BeadKind::Task, "Build UI")
                    .parent(&epic.id)
                    .meta("folder", "01-build-ui"),
            )
            .unwrap();

        assert_eq!(repo.get(&task.id).unwrap().unwrap().meta("folder"), Some("01-build-ui"));
        assert!(repo.get("bd-missing").unwrap().is_none());

        let updated = repo
            .update(&task.id, BeadUpdate::default().status("closed").meta("summary", "ok"))
            .unwrap();
        assert_eq!(updated.status, "closed");
        assert_eq!(updated.meta("folder"), Some("01-build-ui"));
        assert_eq!(updated.meta("summary"), Some("ok"));

        let children = repo
            .list(&BeadFilter::kind(BeadKind::Task).with_parent(&epic.id))
            .unwrap();
        assert_eq!(children.len(), 1);
        assert!(repo.list(&BeadFilter::kind(BeadKind::Plan)).unwrap().is_empty());
        assert_eq!(repo.list(&BeadFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_update_missing_bead() {
        let repo = JsonlBeadsRepository::in_memory();
        let err = repo.update("bd-nope", BeadUpdate::default()).unwrap_err();
        assert!(matches!(err, StoreError::BeadNotFound(id) if id == "bd-nope"));
    }

    #[test]
    fn test_open_persists_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let id = {
            let repo = JsonlBeadsRepository::open(tmp.path()).unwrap();
            let bead = repo
                .create(NewBead::new(BeadKind::Plan, "plan").body("# Plan"))
                .unwrap();
            repo.update(&bead.id, BeadUpdate::default().meta("approved", "true"))
                .unwrap();
            bead.id
        };
        let path = tmp.path().join(".beads").join("issues.jsonl");
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);

        let reopened = JsonlBeadsRepository::open(tmp.path()).unwrap();
        let bead = reopened.get(&id).unwrap().unwrap();
        assert_eq!(bead.body, "# Plan");
        assert_eq!(bead.meta("approved"), Some("true"));
        assert_ne!(reopened.generate_id(DEFAULT_ID_PREFIX), id);
    }

    #[test]
    fn test_open_reports_bad_line() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".beads");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("issues.jsonl"), "\n{broken\n").unwrap();
        let err = JsonlBeadsRepository::open(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("issues.jsonl:2"));
    }

    #[test]
    fn test_failed_create_leaves_state_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonlBeadsRepository::open(tmp.path()).unwrap();
        // `.beads` as a plain file makes every write fail.
        std::fs::write(tmp.path().join(".beads"), "not a dir").unwrap();
        assert!(repo.create(NewBead::new(BeadKind::Epic, "checkout")).is_err());
        assert!(repo.list(&BeadFilter::default()).unwrap().is_empty());
        assert!(repo.create(NewBead::new(BeadKind::Epic, "checkout")).is_err());
        assert!(repo.list(&BeadFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_failed_update_keeps_previous_bead() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonlBeadsRepository::open(tmp.path()).unwrap();
        let bead = repo.create(NewBead::new(BeadKind::Task, "Build UI")).unwrap();
        let issues = tmp.path().join(".beads").join("issues.jsonl");
        std::fs::remove_file(&issues).unwrap();
        std::fs::create_dir(&issues).unwrap();

        let err = repo.update(&bead.id, BeadUpdate::default().status("closed"));
        assert!(matches!(err, Err(StoreError::Io(_))));
        assert_eq!(repo.get(&bead.id).unwrap().unwrap().status, "open");
    }

    #[test]
    fn test_lazy_repository_defers_open_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".beads");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("issues.jsonl"), "{broken\n").unwrap();

        let repo = LazyBeadsRepository::new(tmp.path());
        assert!(repo.generate_id("task").starts_with("task-"));
        let err = repo.list(&BeadFilter::default()).unwrap_err();
        assert!(matches!(&err, StoreError::Repository(m) if m.contains("issues.jsonl:1")));
        assert!(repo.create(NewBead::new(BeadKind::Epic, "x")).is_err());
    }

    #[test]
    fn test_lazy_repository_reads_existing_beads() {
        let tmp = tempfile::tempdir().unwrap();
        let id = JsonlBeadsRepository::open(tmp.path())
            .unwrap()
            .create(NewBead::new(BeadKind::Epic, "auth"))
            .unwrap()
            .id;
        let repo = LazyBeadsRepository::new(tmp.path());
        assert_eq!(repo.get(&id).unwrap().unwrap().title, "auth");
    }
}
