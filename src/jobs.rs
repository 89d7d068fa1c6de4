use std::sync::Arc;

use apalis::cron::CronStream;
use apalis::prelude::*;
use apalis::utils::TokioExecutor;

use crate::{modules, types};

pub async fn monitor(ctx: Arc<types::Context>) -> Monitor<TokioExecutor> {
    let all_jobs = modules::cleanup::job::list(ctx);

    let mut monitor = Monitor::<TokioExecutor>::new();

    for job in all_jobs {
        let run = job.run.clone();
        let worker = WorkerBuilder::new(job.name)
            .stream(CronStream::new(job.schedule.clone()).into_stream())
            .build_fn(move |_tick: types::Job| {
                let run = run.clone();
                async move { run().await }
            });

        monitor = monitor.register_with_count(1, worker);
    }

    monitor
}
