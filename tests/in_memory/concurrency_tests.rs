//! Shared in-memory repository use from concurrent tasks.

use super::helpers::{TestService, service};
use mikado::task_graph::{
    domain::TaskGraphId,
    services::{StartTaskRequest, TaskGraphServiceResult},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn graphs_started_in_parallel_are_all_retrievable(service: TestService) -> eyre::Result<()> {
    let ids: Vec<TaskGraphId> = (0..16).map(|_| TaskGraphId::new()).collect();

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let worker = service.clone();
            tokio::spawn(async move {
                worker
                    .start_task(StartTaskRequest::new(id, format!("Goal {id}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        let started: TaskGraphServiceResult<_> = handle.await?;
        started?;
    }

    for id in ids {
        let view = service.get_by_id(id).await?;
        eyre::ensure!(view.goal == format!("Goal {id}"));
    }
    Ok(())
}
