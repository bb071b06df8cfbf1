//! Task registry for long-running dashboard actions with observable status.
//!
//! "Run analysis" and "Generate with AI" are modelled as tasks that move from
//! `Pending` to exactly one terminal state. The work itself sits behind
//! `TaskRunner`, so a simulated delay and a real backend call share one contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ResumeScreening,
    SkillMatching,
    JobDescription,
    DashboardInsights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Succeeded { summary: String },
    Failed { error: String },
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskSnapshot {
    pub id: Uuid,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Runner trait
// ────────────────────────────────────────────────────────────────────────────

/// Performs the work behind a task. Returns a short summary on success.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, kind: TaskKind) -> Result<String, String>;
}

/// Waits a fixed duration, then reports success. Stands in for the analysis backend.
pub struct SimulatedRunner {
    pub duration: Duration,
}

#[async_trait]
impl TaskRunner for SimulatedRunner {
    async fn run(&self, kind: TaskKind) -> Result<String, String> {
        tokio::time::sleep(self.duration).await;
        let summary = match kind {
            TaskKind::ResumeScreening => "Resume analysis complete",
            TaskKind::SkillMatching => "Skill matching analysis complete",
            TaskKind::JobDescription => "Job description draft generated",
            TaskKind::DashboardInsights => "Dashboard insights refreshed",
        };
        Ok(summary.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

struct TaskEntry {
    snapshot: TaskSnapshot,
    cancel: CancellationToken,
    /// Monotonic time of the terminal transition; drives retention.
    settled_at: Option<Instant>,
}

/// Terminal tasks stay readable for `retention`, then are dropped on the next `start`.
#[derive(Clone)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<HashMap<Uuid, TaskEntry>>>,
    runner: Arc<dyn TaskRunner>,
    retention: Duration,
}

impl TaskRegistry {
    pub fn new(runner: Arc<dyn TaskRunner>, retention: Duration) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            runner,
            retention,
        }
    }

    /// Registers a pending task and starts it on the runtime.
    pub async fn start(&self, kind: TaskKind) -> TaskSnapshot {
        let snapshot = TaskSnapshot {
            id: Uuid::new_v4(),
            kind,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            finished_at: None,
        };
        let cancel = CancellationToken::new();

        {
            let mut tasks = self.tasks.write().await;
            sweep(&mut tasks, self.retention);
            tasks.insert(
                snapshot.id,
                TaskEntry {
                    snapshot: snapshot.clone(),
                    cancel: cancel.clone(),
                    settled_at: None,
                },
            );
        }
        info!("Task {} ({kind:?}) started", snapshot.id);

        let id = snapshot.id;
        let runner = Arc::clone(&self.runner);
        let tasks = Arc::clone(&self.tasks);
        tokio::spawn(async move {
            let status = tokio::select! {
                _ = cancel.cancelled() => TaskStatus::Cancelled,
                outcome = runner.run(kind) => match outcome {
                    Ok(summary) => TaskStatus::Succeeded { summary },
                    Err(error) => {
                        warn!("Task {id} failed: {error}");
                        TaskStatus::Failed { error }
                    }
                },
            };
            finish(&tasks, id, status).await;
        });

        snapshot
    }

    pub async fn get(&self, id: Uuid) -> Option<TaskSnapshot> {
        self.tasks.read().await.get(&id).map(|e| e.snapshot.clone())
    }

    /// Cancels a pending task. Terminal tasks are returned unchanged.
    pub async fn cancel(&self, id: Uuid) -> Option<TaskSnapshot> {
        let token = {
            let tasks = self.tasks.read().await;
            let entry = tasks.get(&id)?;
            if entry.snapshot.status.is_terminal() {
                return Some(entry.snapshot.clone());
            }
            entry.cancel.clone()
        };

        token.cancel();
        finish(&self.tasks, id, TaskStatus::Cancelled).await;
        self.get(id).await
    }
}

/// Moves a pending task to `status`. The first terminal state wins.
async fn finish(tasks: &RwLock<HashMap<Uuid, TaskEntry>>, id: Uuid, status: TaskStatus) {
    let mut tasks = tasks.write().await;
    let Some(entry) = tasks.get_mut(&id) else {
        return;
    };
    if entry.snapshot.status.is_terminal() {
        return;
    }
    debug!("Task {id} -> {status:?}");
    entry.snapshot.status = status;
    entry.snapshot.finished_at = Some(Utc::now());
    entry.settled_at = Some(Instant::now());
}

/// Drops terminal tasks settled at least `retention` ago. Pending tasks are kept.
fn sweep(tasks: &mut HashMap<Uuid, TaskEntry>, retention: Duration) {
    let before = tasks.len();
    tasks.retain(|_, entry| {
        entry
            .settled_at
            .map_or(true, |at| at.elapsed() < retention)
    });
    let dropped = before - tasks.len();
    if dropped > 0 {
        debug!("Dropped {dropped} settled task(s)");
    }
}
