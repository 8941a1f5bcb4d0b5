//! Admin-side working copies that are edited locally and sent whole.

use crate::form::FormValues;

use super::entities::{NewContactMessage, Project, ProjectInput, Service};
use super::id::EntityId;

/// Split a comma-separated tech list into trimmed, non-empty tags.
pub fn parse_tech_stack(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Project being created (`id` is `None`) or edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub id: Option<EntityId>,
    pub title: String,
    pub description: String,
    pub live_url: String,
    /// Raw comma-separated tags as typed.
    pub tech_stack: String,
    pub image_url: String,
}

impl ProjectDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            title: project.title.clone(),
            description: project.description.clone(),
            live_url: project.live_url.clone().unwrap_or_default(),
            tech_stack: project.tech_stack.join(", "),
            image_url: project.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Record an uploaded image for this draft.
    pub fn set_image(&mut self, url: String) {
        self.image_url = url;
    }

    pub fn to_input(&self) -> ProjectInput {
        ProjectInput {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            live_url: self.live_url.trim().to_string(),
            tech_stack: parse_tech_stack(&self.tech_stack),
            image_url: self.image_url.clone(),
        }
    }
}

/// Which text field of a service row to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
    Name,
    Price,
    Description,
}

/// Scratch copy of the services list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceDraft {
    rows: Vec<Service>,
}

impl ServiceDraft {
    pub fn from_services(services: &[Service]) -> Self {
        Self {
            rows: services.to_vec(),
        }
    }

    /// Discard local edits and start over from `services`.
    pub fn reset_from(&mut self, services: &[Service]) {
        self.rows = services.to_vec();
    }

    pub fn add_blank(&mut self) {
        self.rows.push(Service::default());
    }

    /// Remove a row. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Edit a row. Out-of-range indices are ignored.
    pub fn set_field(&mut self, index: usize, field: ServiceField, value: impl Into<String>) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        let value = value.into();
        match field {
            ServiceField::Name => row.name = value,
            ServiceField::Price => row.price = value,
            ServiceField::Description => row.description = value,
        }
    }

    pub fn rows(&self) -> &[Service] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Service> {
        self.rows
    }
}

impl NewContactMessage {
    /// Build from contact-form values. An empty phone is omitted.
    pub fn from_values(values: &FormValues) -> Self {
        let field = |name: &str| values.get(name).cloned().unwrap_or_default();
        let phone = field("phone");
        Self {
            name: field("name"),
            email: field("email"),
            phone: (!phone.trim().is_empty()).then_some(phone),
            message: field("message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tech_stack_is_trimmed_and_filtered() {
        assert_eq!(
            parse_tech_stack(" Rust, Tokio ,, axum ,"),
            vec!["Rust", "Tokio", "axum"]
        );
        assert!(parse_tech_stack("").is_empty());
    }

    #[test]
    fn draft_from_project_round_trips_tags() {
        let project = Project {
            id: EntityId::from(9),
            title: "Site".into(),
            description: "d".into(),
            live_url: Some("https://example.com".into()),
            tech_stack: vec!["React".into(), "Node".into()],
            image_url: None,
        };
        let draft = ProjectDraft::from_project(&project);
        assert!(!draft.is_new());
        assert_eq!(draft.tech_stack, "React, Node");
        assert_eq!(draft.to_input().tech_stack, vec!["React", "Node"]);
        assert_eq!(draft.to_input().image_url, "");
    }

    #[test]
    fn service_draft_edits() {
        let mut draft = ServiceDraft::from_services(&[Service {
            name: "Web".into(),
            price: "$100".into(),
            description: "Sites".into(),
        }]);
        draft.add_blank();
        draft.set_field(1, ServiceField::Name, "API");
        draft.set_field(7, ServiceField::Name, "ignored");
        draft.remove(0);
        draft.remove(5);

        assert_eq!(draft.rows().len(), 1);
        assert_eq!(draft.rows()[0].name, "API");
        assert_eq!(draft.rows()[0].price, "");
    }

    #[test]
    fn contact_message_from_form_values() {
        let mut values = FormValues::new();
        values.insert("name".into(), "A".into());
        values.insert("email".into(), "a@b.com".into());
        values.insert("phone".into(), "  ".into());
        values.insert("message".into(), "hi".into());

        let msg = NewContactMessage::from_values(&values);
        assert_eq!(msg.name, "A");
        assert!(msg.phone.is_none());
    }
}
