//! Records exchanged with the portfolio API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SecureString;

use super::id::EntityId;

/// Singleton owner profile. Every field is optional so partially filled
/// profiles decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Messaging handle shown on the contact page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub live_url: Option<String>,
    /// Technology tags, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body for creating or updating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub live_url: String,
    pub tech_stack: Vec<String>,
    pub image_url: String,
}

/// One offered service. The list is replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form price label (e.g., "$500+").
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Body of a public contact-form submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// Admin dashboard aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub projects_count: u64,
    #[serde(default)]
    pub services_count: u64,
    #[serde(default)]
    pub messages_count: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: EntityId,
    pub action: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub projects: u64,
    pub services: u64,
    pub messages: u64,
    pub views: u64,
}

impl DashboardStats {
    /// Counts, falling back to cached collection sizes where the stats
    /// report zero.
    pub fn counts_with_fallback(
        &self,
        projects: Option<usize>,
        services: Option<usize>,
        messages: Option<usize>,
    ) -> DashboardCounts {
        fn pick(reported: u64, cached: Option<usize>) -> u64 {
            if reported > 0 {
                reported
            } else {
                cached.map_or(0, |n| n as u64)
            }
        }
        DashboardCounts {
            projects: pick(self.projects_count, projects),
            services: pick(self.services_count, services),
            messages: pick(self.messages_count, messages),
            views: self.total_views,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecureString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
