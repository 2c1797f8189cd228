use tally_core::notify::{ChangeEvent, Notifier};

/// Reports interactive changes to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &ChangeEvent) {
        match event {
            ChangeEvent::Created(id) => tracing::info!(%id, "transaction created"),
            ChangeEvent::Updated(id) => tracing::info!(%id, "transaction updated"),
            ChangeEvent::Deleted(ids) => tracing::info!(count = ids.len(), "transactions deleted"),
        }
    }
}
