//! The recurring-transaction service.
//!
//! [`RecurringEngine`] is the in-process API the host application calls.
//! It owns the store handle and routes every change through one of two
//! write paths:
//!
//! - interactive changes (create, edit, pay, cancel) go straight to the
//!   store and are reported to the [`Notifier`];
//! - generated occurrences go through the [`SilentWriter`] and are never
//!   reported.
//!
//! Every read-decide-write sequence on a series holds that series' lock
//! from [`SeriesLocks`], and the snapshot it decides on is taken after the
//! lock is acquired.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::{EngineConfig, Horizon};
use crate::error::CoreError;
use crate::locks::SeriesLocks;
use crate::models::{NewTransactionData, RecurrenceRule, Transaction, TransactionUpdate};
use crate::notify::{ChangeEvent, NoopNotifier, Notifier};
use crate::series::{expand, occurrence_exists, on_paid, resolve_cancellation, OccurrenceKey};
use crate::store::TransactionStore;
use crate::writer::{SilentWriter, WriteSummary};

/// A freshly created template and the occurrences generated for it.
#[derive(Debug, Clone)]
pub struct TemplateCreated {
    pub template: Transaction,
    pub generated: WriteSummary,
}

/// Result of an interactive edit.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub transaction: Transaction,
    /// The next occurrence computed by the cascade, if it fired.
    pub cascaded: Option<Transaction>,
    pub generated: WriteSummary,
}

#[derive(Debug, Clone)]
pub struct RuleChange {
    pub template: Transaction,
    pub cancelled: Vec<Uuid>,
    pub generated: WriteSummary,
}

/// Result of one renewal pass over all templates.
#[derive(Debug, Clone, Default)]
pub struct RenewalSummary {
    pub templates_processed: usize,
    pub occurrences_created: usize,
    pub templates_skipped: usize,
    pub templates_with_errors: usize,
    pub write_failures: usize,
    pub errors: Vec<(Uuid, String)>,
    pub duration_ms: u128,
}

impl RenewalSummary {
    pub fn is_clean(&self) -> bool {
        self.templates_with_errors == 0 && self.write_failures == 0
    }
}

pub struct RecurringEngine<S> {
    store: Arc<S>,
    writer: SilentWriter<S>,
    locks: SeriesLocks,
    notifier: Arc<dyn Notifier>,
    config: EngineConfig,
}

impl<S: TransactionStore> RecurringEngine<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self::with_notifier(store, config, Arc::new(NoopNotifier))
    }

    pub fn with_notifier(store: Arc<S>, config: EngineConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            writer: SilentWriter::new(store.clone()),
            store,
            locks: SeriesLocks::new(),
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Records a one-off transaction, or a template when `data` carries a
    /// recurrence rule.
    pub async fn create_transaction(
        &self,
        data: NewTransactionData,
        now: DateTime<Utc>,
    ) -> Result<TemplateCreated, CoreError> {
        data.validate()?;
        let transaction = data.into_transaction(now);
        self.store.insert(&transaction).await?;
        self.notifier.notify(&ChangeEvent::Created(transaction.id));

        let generated = if transaction.is_template() {
            self.generate_for_template(transaction.id, self.config.creation_horizon, now)
                .await?
        } else {
            WriteSummary::default()
        };

        Ok(TemplateCreated {
            template: transaction,
            generated,
        })
    }

    /// Creates a template and expands it over the creation horizon.
    pub async fn create_template(
        &self,
        data: NewTransactionData,
        now: DateTime<Utc>,
    ) -> Result<TemplateCreated, CoreError> {
        if data.recurrence.is_none() {
            return Err(CoreError::InvalidRecurrence(
                "a template needs a frequency or an installment plan".to_string(),
            ));
        }
        self.create_transaction(data, now).await
    }

    /// Generates the missing occurrences of the series `id` belongs to, up
    /// to `horizon` from `now`. `id` may be a template or any record with a
    /// recurrence rule; installment plans continue from that record.
    pub async fn generate_for_template(
        &self,
        id: Uuid,
        horizon: Horizon,
        now: DateTime<Utc>,
    ) -> Result<WriteSummary, CoreError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let root = record.series_root();
        let _guard = self.locks.acquire(root).await;
        self.generate_locked(id, root, horizon.target_from(now)?)
            .await
    }

    /// Expands every eligible template against the renewal horizon.
    ///
    /// A failure in one series is recorded in the summary and does not stop
    /// the others. Only a failure to read the snapshot fails the run.
    pub async fn renew_all(&self, now: DateTime<Utc>) -> Result<RenewalSummary, CoreError> {
        let started = Instant::now();
        let mut summary = RenewalSummary::default();

        let snapshot = self.store.list().await?;
        if snapshot.is_empty() {
            tracing::debug!("no transactions; renewal skipped");
            return Ok(summary);
        }
        let target = self.config.renewal.horizon.target_from(now)?;

        for template in snapshot.iter().filter(|t| t.is_template()) {
            if template.recurrence_rule().is_none() {
                tracing::warn!(
                    template_id = %template.id,
                    "template has incomplete recurrence fields; skipped"
                );
                summary.templates_skipped += 1;
                continue;
            }
            if !renewal_eligible(template) {
                continue;
            }

            match self.renew_series(template.id, target).await {
                Ok(None) => {
                    tracing::debug!(template_id = %template.id, "series changed before renewal; skipped");
                    summary.templates_skipped += 1;
                }
                Ok(Some(written)) => {
                    summary.templates_processed += 1;
                    summary.occurrences_created += written.written_count();
                    summary.write_failures += written.failed;
                }
                Err(e) => {
                    tracing::warn!(template_id = %template.id, error = %e, "renewal failed for series");
                    summary.templates_with_errors += 1;
                    summary.errors.push((template.id, e.to_string()));
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis();
        tracing::info!(
            processed = summary.templates_processed,
            created = summary.occurrences_created,
            skipped = summary.templates_skipped,
            errors = summary.templates_with_errors,
            write_failures = summary.write_failures,
            duration_ms = summary.duration_ms as u64,
            "renewal run complete"
        );
        Ok(summary)
    }

    /// Applies an interactive edit. Marking an unpaid fixed occurrence paid
    /// also generates the next occurrence of its series, provided the
    /// series still runs that rule.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        update: TransactionUpdate,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome, CoreError> {
        update.validate()?;
        let root = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?
            .series_root();

        let _guard = self.locks.acquire(root).await;
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let series_root = if existing.id == root {
            Some(existing.clone())
        } else {
            self.store.find_by_id(root).await?
        };
        let cascaded = match &series_root {
            Some(series_root) => on_paid(&existing, series_root, &update)?,
            None => None,
        };

        let mut transaction = existing;
        update.apply(&mut transaction, now);
        self.store.update(&transaction).await?;
        self.notifier.notify(&ChangeEvent::Updated(id));

        let generated = match &cascaded {
            Some(next) => self.persist_cascade(root, next).await?,
            None => WriteSummary::default(),
        };

        Ok(PaymentOutcome {
            transaction,
            cascaded,
            generated,
        })
    }

    pub async fn mark_paid(&self, id: Uuid, now: DateTime<Utc>) -> Result<PaymentOutcome, CoreError> {
        self.update_transaction(id, TransactionUpdate::mark_paid(), now)
            .await
    }

    /// Deletes the unpaid future occurrences of a series and ends it.
    ///
    /// The template keeps its date and amount but loses its recurrence
    /// rule, so later renewal runs leave the series alone. Paid or elapsed
    /// occurrences are kept.
    pub async fn cancel_series(
        &self,
        template_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, CoreError> {
        let _guard = self.locks.acquire(template_id).await;
        let mut template = self.load_template(template_id).await?;

        let cancelled = self.delete_future_occurrences(template_id, now).await?;

        template.set_recurrence_rule(None);
        template.updated_at = now;
        self.store.update(&template).await?;
        self.notifier.notify(&ChangeEvent::Updated(template_id));

        tracing::info!(template_id = %template_id, cancelled = cancelled.len(), "series cancelled");
        Ok(cancelled)
    }

    /// Replaces a template's rule: unpaid future occurrences of the old
    /// rule are deleted and the series is regenerated over the creation
    /// horizon.
    ///
    /// The new rule is anchored at `now`: no generation path (this one,
    /// renewal or the payment cascade) ever backfills its elapsed dates.
    pub async fn edit_template_rule(
        &self,
        template_id: Uuid,
        rule: RecurrenceRule,
        now: DateTime<Utc>,
    ) -> Result<RuleChange, CoreError> {
        rule.validate()?;
        let _guard = self.locks.acquire(template_id).await;
        let mut template = self.load_template(template_id).await?;

        let cancelled = self.delete_future_occurrences(template_id, now).await?;

        template.set_recurrence_rule(Some(rule));
        template.recurrence_anchor = Some(now);
        template.updated_at = now;
        self.store.update(&template).await?;
        self.notifier.notify(&ChangeEvent::Updated(template_id));

        let target = self.config.creation_horizon.target_from(now)?;
        let generated = self
            .generate_locked(template_id, template_id, target)
            .await?;

        tracing::info!(
            template_id = %template_id,
            rule = %rule,
            cancelled = cancelled.len(),
            created = generated.written_count(),
            "template rule changed"
        );
        Ok(RuleChange {
            template,
            cancelled,
            generated,
        })
    }

    async fn load_template(&self, id: Uuid) -> Result<Transaction, CoreError> {
        let template = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        if !template.is_template() {
            return Err(CoreError::InvalidInput(format!(
                "{} is not a recurring template",
                id
            )));
        }
        Ok(template)
    }

    /// Re-checks eligibility under the series lock; `None` when the template
    /// was ended or completed since the renewal snapshot.
    async fn renew_series(
        &self,
        template_id: Uuid,
        target: DateTime<Utc>,
    ) -> Result<Option<WriteSummary>, CoreError> {
        let _guard = self.locks.acquire(template_id).await;
        let current = self.store.find_by_id(template_id).await?;
        if !current.as_ref().is_some_and(renewal_eligible) {
            return Ok(None);
        }
        self.generate_locked(template_id, template_id, target)
            .await
            .map(Some)
    }

    /// Caller holds the series lock for `root`.
    async fn generate_locked(
        &self,
        id: Uuid,
        root: Uuid,
        target: DateTime<Utc>,
    ) -> Result<WriteSummary, CoreError> {
        let known = self.store.list_by_parent(root).await?;
        let mut record = known
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if id != root {
            let follows_root = known
                .iter()
                .find(|t| t.id == root)
                .filter(|series_root| follows_root_rule(&record, series_root));
            let Some(series_root) = follows_root else {
                tracing::debug!(series = %root, from = %id, "record predates the series rule; nothing generated");
                return Ok(WriteSummary::default());
            };
            record.recurrence_anchor = series_root.recurrence_anchor;
        }

        let occurrences = expand(&record, &known, target)?;
        let summary = self.writer.persist(&occurrences).await;

        tracing::debug!(
            series = %root,
            from = %id,
            created = summary.written_count(),
            existing = summary.skipped_existing,
            failed = summary.failed,
            "series expanded"
        );
        Ok(summary)
    }

    /// Caller holds the series lock for `root`.
    async fn persist_cascade(
        &self,
        root: Uuid,
        next: &Transaction,
    ) -> Result<WriteSummary, CoreError> {
        let known = self.store.list_by_parent(root).await?;
        if let Some(key) = OccurrenceKey::of(next) {
            if occurrence_exists(&key, &known) {
                tracing::debug!(series = %root, date = %next.date, "next occurrence already present");
                return Ok(WriteSummary {
                    skipped_existing: 1,
                    ..Default::default()
                });
            }
        }

        Ok(self.writer.persist(std::slice::from_ref(next)).await)
    }

    /// Caller holds the series lock for `template_id`.
    async fn delete_future_occurrences(
        &self,
        template_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, CoreError> {
        let known = self.store.list_by_parent(template_id).await?;
        let ids = resolve_cancellation(template_id, &known, now);
        if ids.is_empty() {
            return Ok(ids);
        }
        let removed = self.store.delete_by_ids(&ids).await?;
        if removed != ids.len() {
            tracing::debug!(expected = ids.len(), removed, "some occurrences were already gone");
        }
        self.notifier.notify(&ChangeEvent::Deleted(ids.clone()));
        Ok(ids)
    }
}

/// Templates renewal expands: fixed ones, and installment plans not yet
/// complete.
fn renewal_eligible(template: &Transaction) -> bool {
    match template.recurrence_rule() {
        Some(RecurrenceRule::Fixed(_)) => template.is_template(),
        Some(RecurrenceRule::Installment { count, current, .. }) => {
            template.is_template() && current < count
        }
        None => false,
    }
}

/// Whether `record` was generated under the rule its series root runs now.
fn follows_root_rule(record: &Transaction, root: &Transaction) -> bool {
    match (record.recurrence_rule(), root.recurrence_rule()) {
        (Some(RecurrenceRule::Fixed(a)), Some(RecurrenceRule::Fixed(b))) => a == b,
        (
            Some(RecurrenceRule::Installment { count, period, .. }),
            Some(RecurrenceRule::Installment {
                count: root_count,
                period: root_period,
                ..
            }),
        ) => count == root_count && period == root_period,
        _ => false,
    }
}
