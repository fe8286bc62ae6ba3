//! Integration tests for the composed platform operations over fixture data.

use chrono::{TimeZone, Utc};
use gated_content::{
    AccessLevel, BlogPostDraft, CancellationToken, ContentKind, CurriculumSubmission, Grade,
    Lesson, Platform, PlatformConfig, PlatformError, StoreError, ValidationError,
    VideoCategory, VideoPatch,
};

fn platform() -> Platform {
    Platform::new(&PlatformConfig::default()).unwrap()
}

fn empty_platform() -> Platform {
    let config = PlatformConfig {
        seed_fixtures: false,
        ..PlatformConfig::default()
    };
    Platform::new(&config).unwrap()
}

fn submission(lessons: Vec<Lesson>) -> CurriculumSubmission {
    CurriculumSubmission {
        title: "Weekly routines".into(),
        topic: "routines".into(),
        description: String::new(),
        thumbnail_url: None,
        access_levels: [AccessLevel::Member].into(),
        is_pinned: false,
        lessons,
    }
}

#[tokio::test(start_paused = true)]
async fn featured_shelf_puts_pinned_first_and_flags_access() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let featured = platform.featured_content(Grade::Free, &cancel).await.unwrap();

    let ids: Vec<_> = featured.videos.iter().map(|v| v.item.id).collect();
    // pinned 1 and 4, then newest unpinned 6 and 5
    assert_eq!(ids, vec![1, 4, 6, 5]);
    let access: Vec<_> = featured.videos.iter().map(|v| v.accessible).collect();
    assert_eq!(access, vec![true, false, true, false]);

    assert_eq!(featured.posts.len(), 3);
    assert!(featured.posts.iter().any(|p| p.accessible));
    assert!(featured.posts.iter().any(|p| !p.accessible));
}

#[tokio::test(start_paused = true)]
async fn curriculum_groups_by_topic() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let groups = platform
        .curriculum(Grade::Master, VideoCategory::Master, &cancel)
        .await
        .unwrap();

    let topics: Vec<_> = groups.iter().map(|g| g.topic.as_str()).collect();
    assert_eq!(topics, vec!["심화 원리", "특강"]);
    assert_eq!(groups[0].lessons.len(), 2);
    // the open lecture is free-only, so a master viewer is locked out of it
    assert!(!groups[1].lessons[0].accessible);
}

#[tokio::test(start_paused = true)]
async fn detail_load_rechecks_access() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let err = platform.load_video(Grade::Member, 4, &cancel).await.unwrap_err();
    assert!(matches!(err, PlatformError::AccessDenied { id: 4, .. }));

    let err = platform.load_video(Grade::Admin, 404, &cancel).await.unwrap_err();
    assert!(matches!(
        err,
        PlatformError::NotFound {
            collection: "videos",
            id: 404
        }
    ));

    let detail = platform.load_video(Grade::Both, 5, &cancel).await.unwrap();
    assert_eq!(detail.video.id, 5);
    let related: Vec<_> = detail.related.iter().map(|v| v.id).collect();
    assert_eq!(related, vec![4, 6]);
}

#[tokio::test(start_paused = true)]
async fn post_detail_rechecks_access() {
    let platform = platform();
    let cancel = CancellationToken::new();

    assert!(matches!(
        platform.load_post(Grade::Free, 2, &cancel).await,
        Err(PlatformError::AccessDenied { id: 2, .. })
    ));
    assert_eq!(platform.load_post(Grade::Free, 1, &cancel).await.unwrap().id, 1);
}

#[tokio::test(start_paused = true)]
async fn curriculum_submission_is_all_or_nothing() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let created = platform
        .submit_curriculum(
            Grade::Member,
            VideoCategory::Membership,
            submission(vec![
                Lesson::new("Mornings", "https://video.example/m.mp4"),
                Lesson::new("Evenings", "https://video.example/e.mp4"),
            ]),
            &cancel,
        )
        .await
        .unwrap();

    let ids: Vec<_> = created.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![7, 8]);
    assert!(created.iter().all(|v| v.topic == "routines"));
    assert_eq!(platform.videos().len(VideoCategory::Membership).unwrap(), 5);

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let err = platform
        .submit_curriculum(
            Grade::Admin,
            VideoCategory::Membership,
            submission(vec![Lesson::new("Nights", "https://video.example/n.mp4")]),
            &cancelled,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Store(StoreError::Cancelled)));
    assert_eq!(platform.videos().len(VideoCategory::Membership).unwrap(), 5);
}

#[tokio::test(start_paused = true)]
async fn curriculum_submission_checks_policy_and_input() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let err = platform
        .submit_curriculum(
            Grade::Member,
            VideoCategory::Master,
            submission(vec![Lesson::new("x", "https://video.example/x.mp4")]),
            &cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Forbidden {
            grade: Grade::Member,
            kind: ContentKind::MasterVideo
        }
    ));

    let err = platform
        .submit_curriculum(
            Grade::Master,
            VideoCategory::Master,
            submission(vec![Lesson::new("", "")]),
            &cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Invalid(ValidationError::NoLessons)));
    assert_eq!(platform.videos().len(VideoCategory::Master).unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn pin_toggle_respects_partition_policy() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let err = platform.toggle_pin(Grade::Master, 2, &cancel).await.unwrap_err();
    assert!(matches!(err, PlatformError::Forbidden { .. }));

    let pinned = platform.toggle_pin(Grade::Both, 2, &cancel).await.unwrap();
    assert!(pinned.is_pinned);
    let unpinned = platform.toggle_pin(Grade::Member, 2, &cancel).await.unwrap();
    assert!(!unpinned.is_pinned);
}

#[tokio::test(start_paused = true)]
async fn edit_rejects_clearing_the_gate() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let err = platform
        .edit_video(
            Grade::Admin,
            1,
            VideoPatch {
                access_levels: Some(Default::default()),
                ..VideoPatch::default()
            },
            &cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Invalid(ValidationError::NoAccessLevels)));
}

#[tokio::test(start_paused = true)]
async fn moving_a_video_needs_rights_on_both_partitions() {
    let platform = platform();
    let cancel = CancellationToken::new();
    let to_master = VideoPatch {
        category: Some(VideoCategory::Master),
        ..VideoPatch::default()
    };

    let err = platform
        .edit_video(Grade::Member, 2, to_master.clone(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Forbidden {
            kind: ContentKind::MasterVideo,
            ..
        }
    ));

    let moved = platform.edit_video(Grade::Both, 2, to_master, &cancel).await.unwrap();
    assert_eq!(moved.category, VideoCategory::Master);
    assert_eq!(platform.videos().len(VideoCategory::Master).unwrap(), 4);
}

#[tokio::test(start_paused = true)]
async fn insights_are_admin_managed() {
    let platform = platform();
    let cancel = CancellationToken::new();
    let draft = BlogPostDraft {
        title: "New insight".into(),
        excerpt: None,
        content: "Short body".into(),
        featured_image: None,
        access_levels: [AccessLevel::Member].into(),
        published_at: None,
    };

    let err = platform
        .publish_post(Grade::Both, draft.clone(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Forbidden { .. }));

    let post = platform.publish_post(Grade::Admin, draft, &cancel).await.unwrap();
    assert_eq!(post.id, 4);
    assert_eq!(post.excerpt, "Short body...");

    let listed = platform.list_posts(Grade::Member, &cancel).await.unwrap();
    assert_eq!(listed[0].item.id, 4);
    assert!(listed[0].accessible);

    assert!(platform.delete_post(Grade::Admin, 4, &cancel).await.unwrap());
    assert!(matches!(
        platform.delete_post(Grade::Admin, 4, &cancel).await,
        Err(PlatformError::Store(StoreError::NotFound { id: 4, .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn hidden_reviews_are_for_moderators() {
    let platform = platform();
    let cancel = CancellationToken::new();

    assert_eq!(platform.visible_reviews(Grade::Admin, &cancel).await.unwrap().len(), 4);
    let public = platform.visible_reviews(Grade::Member, &cancel).await.unwrap();
    assert_eq!(public.len(), 3);
    assert!(public.iter().all(|r| !r.is_hidden));

    let err = platform
        .toggle_review_hidden(Grade::Member, 3, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Forbidden { .. }));

    let revealed = platform
        .toggle_review_hidden(Grade::Admin, 3, &cancel)
        .await
        .unwrap();
    assert!(!revealed.is_hidden);
    assert_eq!(platform.visible_reviews(Grade::Free, &cancel).await.unwrap().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn review_submission_and_likes() {
    let platform = empty_platform();
    let cancel = CancellationToken::new();

    let review = platform
        .submit_review(Grade::Both, "사용자1", "  정말 좋아요  ", &cancel)
        .await
        .unwrap();
    assert_eq!(review.content, "정말 좋아요");
    assert_eq!(review.user_grade, Grade::Both);

    platform.like_review(Grade::Free, review.id, &cancel).await.unwrap();
    let liked = platform.like_review(Grade::Member, review.id, &cancel).await.unwrap();
    assert_eq!(liked.likes, 2);

    let too_long = "x".repeat(501);
    let err = platform
        .submit_review(Grade::Free, "u", &too_long, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Invalid(ValidationError::TooLong { .. })));
}

#[tokio::test(start_paused = true)]
async fn any_grade_edits_reviews_but_only_admins_moderate() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let edited = platform
        .edit_review(Grade::Member, 2, "  다시 봐도 알찹니다  ", &cancel)
        .await
        .unwrap();
    assert_eq!(edited.content, "다시 봐도 알찹니다");
    assert!(!edited.is_hidden);

    let err = platform
        .toggle_review_hidden(Grade::Member, 2, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Forbidden {
            grade: Grade::Member,
            kind: ContentKind::ReviewModeration
        }
    ));
    let err = platform.delete_review(Grade::Free, 2, &cancel).await.unwrap_err();
    assert!(matches!(err, PlatformError::Forbidden { .. }));
}

#[tokio::test(start_paused = true)]
async fn hidden_reviews_cannot_be_liked_or_edited_by_viewers() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let err = platform.like_review(Grade::Free, 3, &cancel).await.unwrap_err();
    assert!(matches!(
        err,
        PlatformError::NotFound {
            collection: "reviews",
            id: 3
        }
    ));
    let err = platform
        .edit_review(Grade::Member, 3, "rewritten", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::NotFound { id: 3, .. }));

    let untouched = platform.reviews().get_by_id(3, &cancel).await.unwrap().unwrap();
    assert_eq!(untouched.likes, 0);
    assert_eq!(untouched.content, "광고성 글입니다.");

    let liked = platform.like_review(Grade::Admin, 3, &cancel).await.unwrap();
    assert_eq!(liked.likes, 1);
}

#[tokio::test(start_paused = true)]
async fn page_stats_over_fixture_data() {
    let platform = platform();
    let cancel = CancellationToken::new();
    let now = Utc.with_ymd_and_hms(2024, 3, 18, 23, 0, 0).unwrap();

    let public = platform.review_stats(Grade::Member, now, &cancel).await.unwrap();
    assert_eq!(public.total_reviews, 3);
    assert_eq!(public.written_today, 1);
    // 22 likes over 3 visible reviews
    assert_eq!(public.avg_likes, 7);
    let moderated = platform.review_stats(Grade::Admin, now, &cancel).await.unwrap();
    assert_eq!(moderated.total_reviews, 4);
    assert_eq!(moderated.avg_likes, 6);

    let insights = platform.insight_stats(now, &cancel).await.unwrap();
    assert_eq!(insights.total_posts, 3);
    assert_eq!(insights.published_this_month, 1);
    assert_eq!(insights.avg_reading_minutes, 1);

    let membership = platform
        .partition_stats(VideoCategory::Membership, &cancel)
        .await
        .unwrap();
    assert_eq!((membership.total_videos, membership.pinned_videos), (3, 1));
}

#[tokio::test(start_paused = true)]
async fn dashboard_counts_fixture_data() {
    let platform = platform();
    let cancel = CancellationToken::new();
    let now = Utc.with_ymd_and_hms(2024, 4, 20, 0, 0, 0).unwrap();

    assert!(matches!(
        platform.dashboard(Grade::Member, now, &cancel).await,
        Err(PlatformError::Forbidden { .. })
    ));

    let stats = platform.dashboard(Grade::Admin, now, &cancel).await.unwrap();
    assert_eq!(stats.total_users, 6);
    assert_eq!(stats.total_videos, 6);
    assert_eq!(stats.total_posts, 3);
    assert_eq!(stats.total_reviews, 4);
    assert_eq!(stats.users_by_grade[&Grade::Free], 2);
    assert_eq!(stats.new_users, 1);
    assert_eq!(stats.new_videos, 0);
}

#[tokio::test(start_paused = true)]
async fn admin_changes_user_grades() {
    let platform = platform();
    let cancel = CancellationToken::new();

    let err = platform
        .change_user_grade(Grade::Both, 5, Grade::Member, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Forbidden { .. }));

    let updated = platform
        .change_user_grade(Grade::Admin, 5, Grade::Member, &cancel)
        .await
        .unwrap();
    assert_eq!(updated.grade, Grade::Member);
    assert_eq!(updated.name, "정무료");

    let users = platform.list_users(Grade::Admin, &cancel).await.unwrap();
    assert_eq!(users.iter().find(|u| u.id == 5).unwrap().grade, Grade::Member);
}

#[test]
fn invalid_config_is_rejected() {
    let config = PlatformConfig::from_toml_str("[latency]\nmin_ms = 10\nmax_ms = 20\n").unwrap();
    assert!(Platform::new(&config).is_ok());

    let mut bad = PlatformConfig::default();
    bad.latency.min_ms = 900;
    bad.latency.max_ms = 100;
    assert!(matches!(Platform::new(&bad), Err(PlatformError::Config(_))));
}
