//! # Tally Core Library
//!
//! Recurring transaction generation for a personal-finance ledger.
//!
//! A recurring transaction is declared once, as a *template*, and the engine
//! materializes its concrete, dated *occurrences* ahead of time.
//!
//! ## Features
//!
//! - **Fixed series**: open-ended daily, weekly, monthly, quarterly or annual
//!   recurrence with calendar-aware stepping (Jan 31 + 1 month = Feb 29)
//! - **Installment plans**: a known number of payments spaced by weeks,
//!   months or years
//! - **Idempotent generation**: occurrence ids are derived from the series
//!   and the date or installment index, so re-running any generation path
//!   never duplicates
//! - **Payment cascade**: settling a fixed occurrence generates the next one
//! - **Background renewal**: a scheduler keeps every series filled up to a
//!   rolling horizon
//!
//! ## Core Modules
//!
//! - [`recurrence`]: date arithmetic for both series kinds
//! - [`series`]: pure expansion, cascade, existence and cancellation logic
//! - [`engine`]: the service facade that ties series logic to a store
//! - [`scheduler`]: the background renewal task
//! - [`store`]: the persistence port with SQLite and in-memory backends
//! - [`writer`]: silent persistence of generated occurrences
//! - [`db`]: database connection and migration management
//! - [`config`]: horizons and renewal timing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::Utc;
//! use tally_core::{
//!     config::EngineConfig,
//!     db,
//!     engine::RecurringEngine,
//!     models::{FixedFrequency, NewTransactionData, RecurrenceRule},
//!     scheduler::spawn_renewal,
//!     store::SqliteStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("tally.db").await?;
//!     let engine = Arc::new(RecurringEngine::new(
//!         Arc::new(SqliteStore::new(pool)),
//!         EngineConfig::default(),
//!     ));
//!
//!     let rent = NewTransactionData {
//!         description: "Rent".to_string(),
//!         amount_cents: 120_000,
//!         recurrence: Some(RecurrenceRule::Fixed(FixedFrequency::Monthly)),
//!         ..Default::default()
//!     };
//!     let created = engine.create_template(rent, Utc::now()).await?;
//!     println!("{} occurrences generated", created.generated.written_count());
//!
//!     let renewal = spawn_renewal(engine.clone())?;
//!     tokio::signal::ctrl_c().await?;
//!     renewal.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod locks;
pub mod models;
pub mod notify;
pub mod recurrence;
pub mod scheduler;
pub mod series;
pub mod store;
pub mod writer;
