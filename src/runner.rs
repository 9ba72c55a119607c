// src/runner.rs - job-runner boundary
//
// Thin orchestration around the engine: pull a pending task from a
// store, detect poses for its video, run the analysis and hand the
// result (or the failure reason) back to the store. Analysis failures
// mark the task failed; they never take the runner down. The engine is
// deterministic, so re-running a failed task is always safe.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::{AnalysisEngine, CompleteAnalysisResult};
use crate::narrative::{self, NarrativeClient};
use crate::pose::{CameraAngle, PoseProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub task_id: Uuid,
    pub video_url: String,
    pub camera_angle: CameraAngle,
}

impl AnalysisTask {
    pub fn new(video_url: impl Into<String>, camera_angle: CameraAngle) -> Self {
        Self { task_id: Uuid::new_v4(), video_url: video_url.into(), camera_angle }
    }
}

/// Persistence seam for the task queue. The store owns task state;
/// the runner only moves tasks through it.
pub trait TaskStore {
    fn next_pending(&mut self) -> Option<AnalysisTask>;
    fn complete(&mut self, task_id: Uuid, result: CompleteAnalysisResult);
    fn fail(&mut self, task_id: Uuid, reason: String);
}

/// Runs one task end to end. The narrative client is optional; without
/// it the result keeps the engine's local report.
pub async fn execute_job<P, S>(
    task: AnalysisTask,
    provider: &P,
    engine: &AnalysisEngine,
    narrative_client: Option<&NarrativeClient>,
    store: &mut S,
) where
    P: PoseProvider,
    S: TaskStore,
{
    info!(task_id = %task.task_id, video = %task.video_url, "starting analysis task");

    let outcome = provider
        .detect_video(&task.video_url)
        .and_then(|sequence| Ok(engine.analyze(&sequence, task.camera_angle)?));

    match outcome {
        Ok(mut result) => {
            result.ai_report =
                Some(narrative::generate_or_fallback(narrative_client, &result).await);
            info!(task_id = %task.task_id, score = result.overall_score, "task completed");
            store.complete(task.task_id, result);
        }
        Err(error) => {
            warn!(task_id = %task.task_id, %error, "task failed");
            store.fail(task.task_id, error.to_string());
        }
    }
}

/// Drains pending tasks one at a time, up to `batch_size`. Returns how
/// many tasks were picked up.
pub async fn drain_pending<P, S>(
    provider: &P,
    engine: &AnalysisEngine,
    narrative_client: Option<&NarrativeClient>,
    store: &mut S,
    batch_size: usize,
) -> usize
where
    P: PoseProvider,
    S: TaskStore,
{
    let mut processed = 0;
    for _ in 0..batch_size {
        let Some(task) = store.next_pending() else {
            break;
        };
        execute_job(task, provider, engine, narrative_client, store).await;
        processed += 1;
    }
    processed
}
