//! Change notification port.
//!
//! The engine reports every persisted change through a [`Notifier`] so a
//! front end can refresh whatever it displays. Delivery is best effort.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created(Uuid),
    Updated(Uuid),
    Deleted(Vec<Uuid>),
}

pub trait Notifier: Send + Sync {
    fn notify(&self, event: &ChangeEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &ChangeEvent) {}
}
