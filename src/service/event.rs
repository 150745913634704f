//! Event lifecycle: events, category links, and registrations.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{
    AttendanceStatus, Category, Event, EventPatch, EventRegistration, NewEvent,
    NewEventRegistration, User,
};
use crate::error::{ModelError, Result};
use crate::graph::{EntityKind, JoinSide, JoinTable};
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found, resolve_slug};

pub struct EventService {
    store: Arc<dyn ModelStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── events ───────────────────────────────────────────────

    pub async fn create_event(&self, new: NewEvent) -> Result<Event> {
        check_required("title", &new.title)?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.organizer_id).await?;
        for &category_id in &new.category_ids {
            ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        }
        check_schedule(new.starts_at, new.ends_at, new.registration_deadline)?;
        let slug =
            resolve_slug(self.store.as_ref(), EntityKind::Event, new.slug, &new.title, None)
                .await?;

        let now = Utc::now();
        let mut event = Event {
            id: 0,
            title: new.title,
            slug,
            description: new.description,
            organizer_id: new.organizer_id,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            location: new.location,
            event_type: new.event_type,
            capacity: new.capacity,
            registration_deadline: new.registration_deadline,
            is_published: new.is_published,
            created_at: now,
            updated_at: now,
        };
        event.id = self.store.insert_event(&event, &new.category_ids).await?;
        info!(event_id = event.id, slug = %event.slug, "created event");
        Ok(event)
    }

    pub async fn get_event(&self, id: i64) -> Result<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "events", id })
    }

    pub async fn update_event(&self, id: i64, patch: EventPatch) -> Result<Event> {
        let mut event = self.get_event(id).await?;
        if let Some(title) = &patch.title {
            check_required("title", title)?;
        }
        if let Some(slug) = patch.slug.clone() {
            event.slug = resolve_slug(
                self.store.as_ref(),
                EntityKind::Event,
                Some(slug),
                &event.title,
                Some(id),
            )
            .await?;
        }
        let starts = patch.starts_at.unwrap_or(event.starts_at);
        let ends = patch.ends_at.or(event.ends_at);
        let deadline = patch.registration_deadline.or(event.registration_deadline);
        check_schedule(starts, ends, deadline)?;
        let mut patch = patch;
        patch.slug = None;
        patch.apply(&mut event);
        event.updated_at = Utc::now();
        self.store.update_event(&event).await?;
        Ok(event)
    }

    /// Cascades registrations, detaches galleries, drops category links.
    pub async fn delete_event(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Event, id).await
    }

    pub async fn attach_category(&self, event_id: i64, category_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Event, event_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        self.store.link(JoinTable::EventCategories, event_id, category_id).await
    }

    pub async fn detach_category(&self, event_id: i64, category_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Event, event_id).await?;
        self.store.unlink(JoinTable::EventCategories, event_id, category_id).await
    }

    pub async fn categories_of_event(&self, event_id: i64) -> Result<Vec<Category>> {
        ensure_found(self.store.as_ref(), EntityKind::Event, event_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .linked_ids(JoinTable::EventCategories, JoinSide::Left, event_id)
            .await?
        {
            if let Some(category) = self.store.get_category(id).await? {
                out.push(category);
            }
        }
        Ok(out)
    }

    // ── registrations ────────────────────────────────────────

    /// Register a user for an event. One registration per (event, user);
    /// a full event rejects further registrations.
    pub async fn register(&self, new: NewEventRegistration) -> Result<EventRegistration> {
        let event = self
            .store
            .get_event(new.event_id)
            .await?
            .ok_or(ModelError::MissingReference { entity: "events", id: new.event_id })?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.user_id).await?;
        if self
            .store
            .registration_for(new.event_id, new.user_id)
            .await?
            .is_some()
        {
            return Err(ModelError::UniqueViolation(format!(
                "user {} is already registered for event {}",
                new.user_id, new.event_id
            )));
        }
        if let Some(capacity) = event.capacity {
            let taken = self
                .store
                .count_children(EntityKind::EventRegistration, "event_id", event.id)
                .await?;
            if taken >= capacity as i64 {
                return Err(ModelError::validation(format!(
                    "event {} is at capacity ({capacity})",
                    event.id
                )));
            }
        }

        let now = Utc::now();
        let mut registration = EventRegistration {
            id: 0,
            event_id: new.event_id,
            user_id: new.user_id,
            registered_at: now,
            attendance_status: AttendanceStatus::Registered,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        registration.id = self.store.insert_registration(&registration).await?;
        info!(
            registration_id = registration.id,
            event_id = registration.event_id,
            user_id = registration.user_id,
            "registered for event"
        );
        Ok(registration)
    }

    pub async fn get_registration(&self, id: i64) -> Result<EventRegistration> {
        self.store
            .get_registration(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "event_registrations", id })
    }

    pub async fn set_attendance(
        &self,
        id: i64,
        status: AttendanceStatus,
    ) -> Result<EventRegistration> {
        let mut registration = self.get_registration(id).await?;
        registration.attendance_status = status;
        registration.updated_at = Utc::now();
        self.store.update_registration(&registration).await?;
        Ok(registration)
    }

    pub async fn cancel_registration(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::EventRegistration, id).await
    }

    pub async fn registrations_of_event(&self, event_id: i64) -> Result<Vec<EventRegistration>> {
        ensure_found(self.store.as_ref(), EntityKind::Event, event_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::EventRegistration, "event_id", event_id)
            .await?
        {
            if let Some(registration) = self.store.get_registration(id).await? {
                out.push(registration);
            }
        }
        Ok(out)
    }

    pub async fn registrations_of_user(&self, user_id: i64) -> Result<Vec<EventRegistration>> {
        ensure_found(self.store.as_ref(), EntityKind::User, user_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::EventRegistration, "user_id", user_id)
            .await?
        {
            if let Some(registration) = self.store.get_registration(id).await? {
                out.push(registration);
            }
        }
        Ok(out)
    }

    pub async fn attendees(&self, event_id: i64) -> Result<Vec<User>> {
        let mut out = Vec::new();
        for registration in self.registrations_of_event(event_id).await? {
            if let Some(user) = self.store.get_user(registration.user_id).await? {
                out.push(user);
            }
        }
        Ok(out)
    }
}

fn check_schedule(
    starts_at: chrono::DateTime<Utc>,
    ends_at: Option<chrono::DateTime<Utc>>,
    registration_deadline: Option<chrono::DateTime<Utc>>,
) -> Result<()> {
    if let Some(ends) = ends_at {
        if ends <= starts_at {
            return Err(ModelError::validation("event must end after it starts"));
        }
    }
    if let Some(deadline) = registration_deadline {
        if deadline > starts_at {
            return Err(ModelError::validation(
                "registration deadline must not pass the event start",
            ));
        }
    }
    Ok(())
}
