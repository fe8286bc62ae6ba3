//! Integration tests for the entity stores and the partitioned video store.


use std::time::Duration;

use gated_content::{
    BlogPostPatch, BlogStore, CancellationToken, Grade, Latency, StoreError, UserDraft,
    UserStore, VideoCategory, VideoPatch,
};
use support::{post, seeded_videos, user, video_draft};

fn token() -> CancellationToken {
    CancellationToken::new()
}

#[tokio::test(start_paused = true)]
async fn create_then_get_round_trips() {
    let users = UserStore::new(Latency::default());
    let cancel = token();

    let created = users
        .create(UserDraft::new("kim", "kim@example.com", Grade::Member), &cancel)
        .await
        .unwrap();
    let loaded = users.get_by_id(created.id, &cancel).await.unwrap();

    assert_eq!(loaded, Some(created));
}

#[tokio::test(start_paused = true)]
async fn consecutive_reads_are_equal() {
    let posts = BlogStore::with_records(vec![post(2, "b"), post(1, "a")], Latency::default());
    let cancel = token();

    let first = posts.get_all(&cancel).await.unwrap();
    let second = posts.get_all(&cancel).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn returned_list_is_detached_from_the_store() {
    let posts = BlogStore::with_records(vec![post(1, "a")], Latency::default());
    let cancel = token();

    let mut listed = posts.get_all(&cancel).await.unwrap();
    listed.clear();
    listed.push(post(99, "intruder"));

    let again = posts.get_all(&cancel).await.unwrap();
    assert_eq!(again, vec![post(1, "a")]);
}

#[tokio::test(start_paused = true)]
async fn next_id_follows_the_max_not_the_gaps() {
    let users = UserStore::with_records(
        vec![user(1, "a", Grade::Free), user(3, "c", Grade::Free)],
        Latency::default(),
    );
    let cancel = token();

    let created = users
        .create(UserDraft::new("d", "d@example.com", Grade::Free), &cancel)
        .await
        .unwrap();
    assert_eq!(created.id, 4);

    users.delete(4, &cancel).await.unwrap();
    users.delete(3, &cancel).await.unwrap();
    let next = users
        .create(UserDraft::new("e", "e@example.com", Grade::Free), &cancel)
        .await
        .unwrap();
    assert_eq!(next.id, 2);
}

#[tokio::test(start_paused = true)]
async fn update_of_missing_id_changes_nothing() {
    let posts = BlogStore::with_records(vec![post(2, "b"), post(1, "a")], Latency::default());
    let cancel = token();
    let before = posts.get_all(&cancel).await.unwrap();

    let err = posts
        .update(
            7,
            BlogPostPatch {
                title: Some("renamed".into()),
                ..BlogPostPatch::default()
            },
            &cancel,
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::NotFound {
            collection: "blog_posts",
            id: 7
        }
    );
    assert_eq!(posts.get_all(&cancel).await.unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn delete_shrinks_by_one() {
    let posts = BlogStore::with_records(
        vec![post(3, "c"), post(2, "b"), post(1, "a")],
        Latency::default(),
    );
    let cancel = token();

    assert!(posts.delete(2, &cancel).await.unwrap());
    assert_eq!(posts.len().unwrap(), 2);
    assert_eq!(posts.get_by_id(2, &cancel).await.unwrap(), None);

    let err = posts.delete(2, &cancel).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 2, .. }));
}

#[tokio::test(start_paused = true)]
async fn master_create_takes_max_across_partitions() {
    let videos = seeded_videos();
    let cancel = token();

    let created = videos
        .create(video_draft("deep dive", VideoCategory::Master), &cancel)
        .await
        .unwrap();
    assert_eq!(created.id, 5);

    let master = videos.get_master_videos(&cancel).await.unwrap();
    let membership = videos.get_membership_videos(&cancel).await.unwrap();
    assert_eq!(master[0], created);
    assert!(membership.iter().all(|v| v.id != 5));
}

#[tokio::test(start_paused = true)]
async fn get_by_id_spans_both_partitions() {
    let videos = seeded_videos();
    let cancel = token();

    for id in 1..=4 {
        let found = videos.get_by_id(id, &cancel).await.unwrap().unwrap();
        assert_eq!(found.id, id);
    }
    assert_eq!(videos.get_by_id(5, &cancel).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn pin_update_touches_only_the_pin() {
    let videos = seeded_videos();
    let cancel = token();
    let before = videos.get_by_id(2, &cancel).await.unwrap().unwrap();

    videos.update(2, VideoPatch::pinned(true), &cancel).await.unwrap();

    let listed = videos.get_membership_videos(&cancel).await.unwrap();
    let after = listed.into_iter().find(|v| v.id == 2).unwrap();
    assert!(after.is_pinned);

    let mut expected = before;
    expected.is_pinned = true;
    assert_eq!(after, expected);
}

#[tokio::test(start_paused = true)]
async fn video_update_and_delete_of_missing_id_fail() {
    let videos = seeded_videos();
    let cancel = token();

    let err = videos
        .update(42, VideoPatch::pinned(true), &cancel)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            collection: "videos",
            id: 42
        }
    );
    assert!(videos.delete(42, &cancel).await.is_err());
    assert_eq!(videos.len(VideoCategory::Membership).unwrap(), 2);
    assert_eq!(videos.len(VideoCategory::Master).unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn video_delete_removes_from_its_partition() {
    let videos = seeded_videos();
    let cancel = token();

    assert!(videos.delete(3, &cancel).await.unwrap());
    assert_eq!(videos.len(VideoCategory::Master).unwrap(), 1);
    assert_eq!(videos.len(VideoCategory::Membership).unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn every_call_waits_for_simulated_latency() {
    let users = UserStore::new(Latency::from_millis(200, 500));
    let cancel = token();

    let start = tokio::time::Instant::now();
    users.get_all(&cancel).await.unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn cancelling_mid_flight_drops_the_mutation() {
    let users = UserStore::new(Latency::fixed(Duration::from_millis(300)));
    let cancel = token();

    let pending = {
        let users = users.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            users
                .create(UserDraft::new("late", "late@example.com", Grade::Free), &cancel)
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    assert_eq!(pending.await.unwrap(), Err(StoreError::Cancelled));
    assert_eq!(users.len().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn writes_are_visible_to_other_handles() {
    let videos = seeded_videos();
    let other = videos.clone();
    let cancel = token();

    videos.delete(1, &cancel).await.unwrap();
    let ids: Vec<_> = other
        .get_membership_videos(&cancel)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids, vec![2]);
}
