//! Typed records for every entity the client reads or writes.

mod drafts;
mod entities;
mod id;
mod time;

pub use drafts::{parse_tech_stack, ProjectDraft, ServiceDraft, ServiceField};
pub use entities::{
    Activity, ContactMessage, DashboardCounts, DashboardStats, LoginRequest, LoginResponse,
    NewContactMessage, Profile, Project, ProjectInput, Service, UploadResponse,
};
pub use id::EntityId;
pub use time::relative_time;
