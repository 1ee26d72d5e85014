//! User-facing alerts and the non-blocking diagnostic channel.

use std::fmt;

use expense_shared::domain::BillId;
use tracing::{error, warn};

use crate::error::{FormatError, StoreError};

/// A recovered failure that is logged instead of shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    Format { bill_id: BillId, error: FormatError },
    Upload(StoreError),
    Update {
        bill_id: Option<BillId>,
        error: StoreError,
    },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Format { bill_id, error } => write!(f, "bill {bill_id}: {error}"),
            Fault::Upload(error) => write!(f, "receipt upload failed: {error}"),
            Fault::Update { bill_id, error } => match bill_id {
                Some(bill_id) => write!(f, "bill {bill_id} update failed: {error}"),
                None => write!(f, "bill update failed: {error}"),
            },
        }
    }
}

pub trait Feedback: Send + Sync {
    /// Blocking notice the user has to acknowledge.
    fn alert(&self, message: &str);
    fn report(&self, fault: Fault);
}

/// Structured `tracing` record of a fault; hosts without their own channel call this from
/// [`Feedback::report`].
pub fn log_fault(fault: &Fault) {
    match fault {
        Fault::Format { bill_id, error } => {
            warn!(bill_id = %bill_id, error = %error, "bill kept unformatted")
        }
        Fault::Upload(err) => error!(error = %err, "receipt upload failed"),
        Fault::Update { bill_id, error: err } => {
            error!(bill_id = ?bill_id.as_ref().map(BillId::as_str), error = %err, "bill update failed")
        }
    }
}
