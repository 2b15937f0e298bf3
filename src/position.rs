//! Approximate queue position of a job among pending work

use crate::types::Job;

/// Position of `job` among pending jobs, 1-based.
///
/// Counts jobs that are `Queued` or `Downloading` and were created no later than
/// `job` (including `job` itself). Terminal jobs report 0.
///
/// Two jobs created within the same clock tick both count each other, so under
/// concurrent enqueues the reported position can be one higher than the true one.
pub fn position<'a, I>(job: &Job, all_jobs: I) -> usize
where
    I: IntoIterator<Item = &'a Job>,
{
    if job.status.is_terminal() {
        return 0;
    }

    all_jobs
        .into_iter()
        .filter(|other| other.status.is_pending() && other.created_at <= job.created_at)
        .count()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobResult, OutputKind, Status};
    use chrono::{DateTime, Duration};

    fn job_at(offset_ms: i64) -> Job {
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut job = Job::new("https://example.com/v", OutputKind::Video, "720p");
        job.created_at = base + Duration::milliseconds(offset_ms);
        job
    }

    #[test]
    fn lone_job_is_position_one() {
        let job = job_at(0);
        assert_eq!(position(&job, [&job]), 1);
    }

    #[test]
    fn counts_earlier_pending_jobs() {
        let a = job_at(0);
        let b = job_at(10);
        let c = job_at(20);
        let all = [a.clone(), b.clone(), c.clone()];

        assert_eq!(position(&a, &all), 1);
        assert_eq!(position(&b, &all), 2);
        assert_eq!(position(&c, &all), 3);
    }

    #[test]
    fn running_job_still_counts_ahead() {
        let mut a = job_at(0);
        a.begin("starting").unwrap();
        let b = job_at(10);
        let all = [a.clone(), b.clone()];

        assert_eq!(position(&a, &all), 1);
        assert_eq!(position(&b, &all), 2);
    }

    #[test]
    fn finished_jobs_do_not_count_and_report_zero() {
        let mut a = job_at(0);
        a.begin("starting").unwrap();
        a.complete(
            JobResult {
                path: "/tmp/a.mp4".into(),
                display_name: "a.mp4".into(),
                mime_type: "video/mp4".into(),
            },
            "ready",
        )
        .unwrap();

        let mut b = job_at(5);
        b.begin("starting").unwrap();
        b.fail("boom", "failed").unwrap();

        let c = job_at(10);
        let all = [a.clone(), b.clone(), c.clone()];

        assert_eq!(a.status, Status::Done);
        assert_eq!(position(&a, &all), 0);
        assert_eq!(position(&b, &all), 0);
        assert_eq!(position(&c, &all), 1);
    }

    #[test]
    fn equal_timestamps_count_each_other() {
        let a = job_at(0);
        let b = job_at(0);
        let all = [a.clone(), b.clone()];

        assert_eq!(position(&a, &all), 2);
        assert_eq!(position(&b, &all), 2);
    }
}
