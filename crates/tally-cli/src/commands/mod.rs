pub mod add;
pub mod cancel;
pub mod edit;
pub mod list;
pub mod pay;
pub mod renew;
pub mod reschedule;
pub mod watch;

use tally_core::engine::RecurringEngine;
use tally_core::store::SqliteStore;

pub type Engine = RecurringEngine<SqliteStore>;
