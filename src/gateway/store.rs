use super::TaskResponse;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct StoredTask {
    response: TaskResponse,
    stored_at: Instant,
}

/// In-memory task reports keyed by task id.
///
/// Entries expire after `ttl`; once `capacity` is reached the oldest entry is
/// evicted to make room.
pub struct TaskStore {
    tasks: RwLock<HashMap<String, StoredTask>>,
    ttl: Duration,
    capacity: usize,
}

impl TaskStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, response: TaskResponse) {
        self.insert_at(response, Instant::now()).await;
    }

    pub async fn get(&self, task_id: &str) -> Option<TaskResponse> {
        self.get_at(task_id, Instant::now()).await
    }

    /// Number of stored entries, including any not yet purged.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    async fn insert_at(&self, response: TaskResponse, now: Instant) {
        let mut tasks = self.tasks.write().await;
        tasks.retain(|_, task| !is_expired(task, self.ttl, now));

        while tasks.len() >= self.capacity {
            let Some(oldest) = tasks
                .iter()
                .min_by_key(|(_, task)| task.stored_at)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            tracing::debug!(task_id = %oldest, "Evicting oldest stored task");
            tasks.remove(&oldest);
        }

        tasks.insert(
            response.task_id.clone(),
            StoredTask {
                response,
                stored_at: now,
            },
        );
    }

    async fn get_at(&self, task_id: &str, now: Instant) -> Option<TaskResponse> {
        let tasks = self.tasks.read().await;
        tasks
            .get(task_id)
            .filter(|task| !is_expired(task, self.ttl, now))
            .map(|task| task.response.clone())
    }
}

fn is_expired(task: &StoredTask, ttl: Duration, now: Instant) -> bool {
    now.saturating_duration_since(task.stored_at) > ttl
}
