use super::service;
use crate::types::{Context, SchedulableJob};
use std::str::FromStr;
use std::sync::Arc;

fn schedule(expression: &str) -> apalis::cron::Schedule {
    apalis::cron::Schedule::from_str(expression)
        .unwrap_or_else(|err| panic!("Invalid cleanup schedule '{}': {}", expression, err))
}

/// The cron jobs registered by `jobs::monitor`. They run the same sweeps the
/// admin endpoints expose, never in dry-run mode.
pub fn list(ctx: Arc<Context>) -> Vec<SchedulableJob> {
    let unverified_users_ctx = ctx.clone();
    let expired_codes_ctx = ctx.clone();

    vec![
        SchedulableJob {
            name: "cleanup::unverified_users",
            schedule: schedule(ctx.cleanup.unverified_users_schedule.as_str()),
            run: Arc::new(move || {
                let ctx = unverified_users_ctx.clone();
                Box::pin(async move {
                    match service::cleanup_unverified_users(
                        ctx.clone(),
                        ctx.cleanup.days_threshold,
                        false,
                    )
                    .await
                    {
                        Ok(outcome) => {
                            tracing::info!(
                                "Scheduled cleanup deactivated {} users and removed {} codes",
                                outcome.deleted_users,
                                outcome.deleted_codes
                            );
                        }
                        Err(err) => {
                            tracing::error!("Scheduled user cleanup failed: {:?}", err);
                        }
                    }

                    Ok(())
                })
            }),
        },
        SchedulableJob {
            name: "cleanup::expired_codes",
            schedule: schedule(ctx.cleanup.expired_codes_schedule.as_str()),
            run: Arc::new(move || {
                let ctx = expired_codes_ctx.clone();
                Box::pin(async move {
                    match service::cleanup_expired_codes(ctx, false).await {
                        Ok(outcome) => {
                            tracing::info!(
                                "Scheduled cleanup removed {} expired codes",
                                outcome.deleted_codes
                            );
                        }
                        Err(err) => {
                            tracing::error!("Scheduled code cleanup failed: {:?}", err);
                        }
                    }

                    Ok(())
                })
            }),
        },
    ]
}
