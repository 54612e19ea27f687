//! The scheduled publish sweep.
//!
//! A sweep is a function of the current time and the store: it selects every
//! post that is `scheduled` with `scheduled_time <= now` and promotes each one,
//! together with all of its platform associations, to `published`. The timer
//! that drives it lives outside this crate.
//!
//! Each post is promoted in its own store transaction. A failure on one post
//! is logged and recorded in the report; the rest of the batch still runs and
//! the failed post stays `scheduled`, so the next sweep picks it up again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::{PostRepository, PublishResult};

/// What one completed sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Posts returned by the due-post query.
    pub selected: usize,
    pub published: Vec<Uuid>,
    /// Selected, but no longer scheduled or due by the time of the write.
    pub skipped: Vec<Uuid>,
    pub failed: Vec<(Uuid, String)>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed(SweepReport),
    /// Another sweep on this publisher was still in flight; nothing was touched.
    AlreadyRunning,
}

/// Releases the in-flight flag when the sweep ends, including on early return.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Promotes due scheduled posts to published.
pub struct ScheduledPublisher {
    posts: Arc<dyn PostRepository>,
    running: AtomicBool,
}

impl ScheduledPublisher {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            running: AtomicBool::new(false),
        }
    }

    /// Run one sweep at `now`. At most one sweep per publisher runs at a time.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepOutcome, DomainError> {
        let Some(_in_flight) = InFlight::acquire(&self.running) else {
            tracing::warn!("Publish sweep already in progress, skipping this run");
            return Ok(SweepOutcome::AlreadyRunning);
        };

        let due = self.posts.find_due(now).await?;
        let mut report = SweepReport {
            selected: due.len(),
            ..Default::default()
        };

        if due.is_empty() {
            tracing::debug!(now = %now, "No scheduled posts due");
            return Ok(SweepOutcome::Completed(report));
        }

        for item in due {
            let post_id = item.post.id;
            match self.posts.publish(post_id, now).await {
                Ok(PublishResult::Published { associations }) => {
                    tracing::info!(post_id = %post_id, associations, "Published post");
                    report.published.push(post_id);
                }
                Ok(PublishResult::Skipped) => {
                    tracing::debug!(post_id = %post_id, "Post changed before publish, skipped");
                    report.skipped.push(post_id);
                }
                Err(e) => {
                    tracing::warn!(post_id = %post_id, error = %e, "Failed to publish post, will retry next sweep");
                    report.failed.push((post_id, e.to_string()));
                }
            }
        }

        tracing::info!(
            selected = report.selected,
            published = report.published.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Publish sweep finished"
        );

        Ok(SweepOutcome::Completed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::domain::{
        NewPost, Page, PageRequest, Post, PostFilter, PostStatus, PostWithPlatforms,
    };
    use crate::error::RepoError;
    use crate::ports::{CreateResult, CreationQuota};

    /// Serves a fixed due list and answers `publish` per post id.
    struct Canned {
        due: Vec<PostWithPlatforms>,
        answers: HashMap<Uuid, Result<u64, ()>>,
    }

    #[async_trait]
    impl PostRepository for Canned {
        async fn create(
            &self,
            _: Post,
            _: &[Uuid],
            _: CreationQuota,
        ) -> Result<CreateResult, RepoError> {
            Err(RepoError::Query("read-only".into()))
        }

        async fn find_by_id(&self, _: Uuid) -> Result<Option<PostWithPlatforms>, RepoError> {
            Ok(None)
        }

        async fn update(
            &self,
            _: Post,
            _: Option<&[Uuid]>,
        ) -> Result<PostWithPlatforms, RepoError> {
            Err(RepoError::NotFound)
        }

        async fn delete(&self, _: Uuid) -> Result<(), RepoError> {
            Err(RepoError::NotFound)
        }

        async fn list_for_user(
            &self,
            _: Uuid,
            _: &PostFilter,
            page: PageRequest,
        ) -> Result<Page<PostWithPlatforms>, RepoError> {
            Ok(Page::new(vec![], page, 0))
        }

        async fn find_by_user_id(&self, _: Uuid) -> Result<Vec<PostWithPlatforms>, RepoError> {
            Ok(vec![])
        }

        async fn find_due(&self, _: DateTime<Utc>) -> Result<Vec<PostWithPlatforms>, RepoError> {
            Ok(self.due.clone())
        }

        async fn publish(&self, id: Uuid, _: DateTime<Utc>) -> Result<PublishResult, RepoError> {
            match self.answers.get(&id) {
                Some(Ok(associations)) => Ok(PublishResult::Published {
                    associations: *associations,
                }),
                Some(Err(())) => Err(RepoError::Connection("connection reset".into())),
                None => Ok(PublishResult::Skipped),
            }
        }
    }

    fn due_post() -> PostWithPlatforms {
        let new = NewPost {
            title: "Launch".into(),
            content: "Live".into(),
            image_url: None,
            scheduled_time: Some(Utc::now()),
            status: PostStatus::Scheduled,
            platform_ids: vec![],
        };
        PostWithPlatforms {
            post: Post::new(Uuid::new_v4(), &new),
            platforms: vec![],
        }
    }

    #[tokio::test]
    async fn sweep_sorts_each_post_into_its_outcome() {
        let (ok, gone, broken) = (due_post(), due_post(), due_post());
        let answers = HashMap::from([(ok.post.id, Ok(2)), (broken.post.id, Err(()))]);
        let publisher = ScheduledPublisher::new(Arc::new(Canned {
            due: vec![ok.clone(), gone.clone(), broken.clone()],
            answers,
        }));

        let SweepOutcome::Completed(report) = publisher.sweep(Utc::now()).await.unwrap() else {
            panic!("sweep reported overlap");
        };

        assert_eq!(report.selected, 3);
        assert_eq!(report.published, vec![ok.post.id]);
        assert_eq!(report.skipped, vec![gone.post.id]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, broken.post.id);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn empty_sweep_is_clean() {
        let publisher = ScheduledPublisher::new(Arc::new(Canned {
            due: vec![],
            answers: HashMap::new(),
        }));

        assert_eq!(
            publisher.sweep(Utc::now()).await.unwrap(),
            SweepOutcome::Completed(SweepReport::default())
        );
    }

    #[test]
    fn in_flight_flag_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);

        let first = InFlight::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlight::acquire(&flag).is_none());

        drop(first);
        assert!(InFlight::acquire(&flag).is_some());
    }
}
