use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, Id, Placement, Record};
use crate::access::Grade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "Id")]
    pub id: Id,
    pub name: String,
    pub email: String,
    pub grade: Grade,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub grade: Grade,
    /// Stamped by the store when absent.
    pub joined_at: Option<DateTime<Utc>>,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, grade: Grade) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            grade,
            joined_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub grade: Option<Grade>,
}

impl UserPatch {
    pub fn grade(grade: Grade) -> Self {
        Self {
            grade: Some(grade),
            ..Self::default()
        }
    }
}

impl Record for User {
    const COLLECTION: &'static str = "users";
    const PLACEMENT: Placement = Placement::Back;

    type Draft = UserDraft;
    type Patch = UserPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: UserDraft, now: DateTime<Utc>) -> Self {
        User {
            id,
            name: draft.name,
            email: draft.email,
            grade: draft.grade,
            joined_at: draft.joined_at.unwrap_or(now),
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.grade, patch.grade);
    }
}
