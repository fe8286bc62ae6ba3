//! Bundled seed data, embedded at compile time.

use serde::de::DeserializeOwned;

use super::{BlogStore, Latency, ReviewStore, StoreError, UserStore, VideoStore};
use crate::model::{BlogPost, Review, User, Video};

const USERS: &str = include_str!("../fixtures/users.json");
const MEMBERSHIP_VIDEOS: &str = include_str!("../fixtures/membership_videos.json");
const MASTER_VIDEOS: &str = include_str!("../fixtures/master_videos.json");
const BLOG_POSTS: &str = include_str!("../fixtures/blog_posts.json");
const REVIEWS: &str = include_str!("../fixtures/reviews.json");

fn parse<T: DeserializeOwned>(name: &'static str, json: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Fixture {
        name,
        message: e.to_string(),
    })
}

pub fn users() -> Result<Vec<User>, StoreError> {
    parse("users", USERS)
}

pub fn membership_videos() -> Result<Vec<Video>, StoreError> {
    parse("membership_videos", MEMBERSHIP_VIDEOS)
}

pub fn master_videos() -> Result<Vec<Video>, StoreError> {
    parse("master_videos", MASTER_VIDEOS)
}

pub fn blog_posts() -> Result<Vec<BlogPost>, StoreError> {
    parse("blog_posts", BLOG_POSTS)
}

pub fn reviews() -> Result<Vec<Review>, StoreError> {
    parse("reviews", REVIEWS)
}

pub fn user_store(latency: Latency) -> Result<UserStore, StoreError> {
    Ok(UserStore::with_records(users()?, latency))
}

pub fn video_store(latency: Latency) -> Result<VideoStore, StoreError> {
    Ok(VideoStore::with_records(
        membership_videos()?,
        master_videos()?,
        latency,
    ))
}

pub fn blog_store(latency: Latency) -> Result<BlogStore, StoreError> {
    Ok(BlogStore::with_records(blog_posts()?, latency))
}

pub fn review_store(latency: Latency) -> Result<ReviewStore, StoreError> {
    Ok(ReviewStore::with_records(reviews()?, latency))
}
