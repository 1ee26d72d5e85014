//! New bill form: receipt validation, optimistic upload and fire-and-forget submission.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use expense_shared::{
    domain::{BillId, BillStatus},
    protocol::NewBillPayload,
    routes::Route,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    error::NewBillError,
    feedback::{Fault, Feedback},
    identity::IdentityProvider,
    navigation::Navigator,
    store::{CreateBillRequest, ReceiptFile, Store, UpdateBillRequest},
};

pub const ACCEPTED_RECEIPT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
pub const UNSUPPORTED_RECEIPT_ALERT: &str =
    "Seuls les fichiers au format jpg, jpeg ou png sont acceptés.";
pub const DEFAULT_PCT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    FileValidated,
    FilePendingUpload,
    FileUploaded,
    Submitting,
    Submitted,
    Error,
}

/// Upload reference collected before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillDraft {
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub bill_id: Option<BillId>,
}

/// Raw form field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

struct DraftSlot {
    state: DraftState,
    draft: NewBillDraft,
    // Bumped on every selection so a late upload cannot overwrite a newer one.
    upload_generation: u64,
}

impl DraftSlot {
    fn restart(&mut self, state: DraftState) -> u64 {
        self.state = state;
        self.draft = NewBillDraft::default();
        self.upload_generation += 1;
        self.upload_generation
    }
}

fn lock(slot: &Mutex<DraftSlot>) -> MutexGuard<'_, DraftSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Text after the last path separator, then after its last dot.
pub fn receipt_extension(file_name: &str) -> Option<&str> {
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name);
    base.rsplit_once('.').map(|(_, extension)| extension)
}

pub fn is_accepted_receipt(file_name: &str) -> bool {
    receipt_extension(file_name).is_some_and(|extension| {
        ACCEPTED_RECEIPT_EXTENSIONS
            .iter()
            .any(|accepted| extension.eq_ignore_ascii_case(accepted))
    })
}

/// Leading integer of `raw`, the way form inputs are read: `"300.50"` is 300,
/// `"abc"` and `""` are `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(|c| c == '+' || c == '-'));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}

pub fn build_payload(form: &NewBillForm, draft: &NewBillDraft, email: String) -> NewBillPayload {
    NewBillPayload {
        email,
        expense_type: form.expense_type.clone(),
        name: form.name.clone(),
        amount: parse_leading_int(&form.amount),
        date: form.date.clone(),
        vat: form.vat.clone(),
        pct: parse_leading_int(&form.pct).unwrap_or(DEFAULT_PCT),
        commentary: form.commentary.clone(),
        file_url: draft.file_url.clone(),
        file_name: draft.file_name.clone(),
        status: BillStatus::Pending,
    }
}

/// Owns the draft of one "new bill" form.
///
/// Network calls run on spawned Tokio tasks; handlers return their
/// [`JoinHandle`] so a host may wait for them, but nothing here does.
pub struct NewBillController {
    store: Option<Arc<dyn Store>>,
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    feedback: Arc<dyn Feedback>,
    slot: Arc<Mutex<DraftSlot>>,
}

impl NewBillController {
    pub fn new(
        store: Option<Arc<dyn Store>>,
        identity: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
        feedback: Arc<dyn Feedback>,
    ) -> Self {
        Self {
            store,
            identity,
            navigator,
            feedback,
            slot: Arc::new(Mutex::new(DraftSlot {
                state: DraftState::Empty,
                draft: NewBillDraft::default(),
                upload_generation: 0,
            })),
        }
    }

    pub fn state(&self) -> DraftState {
        lock(&self.slot).state
    }

    pub fn draft(&self) -> NewBillDraft {
        lock(&self.slot).draft.clone()
    }

    /// Validates the picked receipt and starts its upload.
    ///
    /// A rejected extension alerts the user, clears the draft and returns
    /// [`NewBillError::UnsupportedExtension`]. Upload failures are reported
    /// through [`Feedback::report`] only. Must run inside a Tokio runtime.
    pub fn handle_change_file(
        &self,
        file: ReceiptFile,
    ) -> Result<Option<JoinHandle<()>>, NewBillError> {
        if !is_accepted_receipt(&file.name) {
            lock(&self.slot).restart(DraftState::Empty);
            self.feedback.alert(UNSUPPORTED_RECEIPT_ALERT);
            return Err(NewBillError::UnsupportedExtension {
                file_name: file.name,
            });
        }

        let generation = lock(&self.slot).restart(DraftState::FileValidated);
        let Some(store) = self.store.clone() else {
            debug!(file_name = %file.name, "no store configured; receipt not uploaded");
            return Ok(None);
        };
        lock(&self.slot).state = DraftState::FilePendingUpload;

        let email = self.identity.current_user_email();
        if email.is_none() {
            warn!("no signed-in user email; uploading receipt without it");
        }
        let file_name = file.name.clone();
        let request = CreateBillRequest { file, email };
        let slot = self.slot.clone();
        let feedback = self.feedback.clone();

        Ok(Some(tokio::spawn(async move {
            let result = store.bills().create(request).await;
            let mut slot = lock(&slot);
            let current = slot.upload_generation == generation;
            match result {
                Ok(_) if !current => {
                    debug!(file_name = %file_name, "discarding superseded receipt upload");
                }
                Ok(created) => {
                    info!(bill_id = %created.key, file_name = %file_name, "receipt uploaded");
                    slot.draft = NewBillDraft {
                        file_url: Some(created.file_url),
                        file_name: Some(file_name),
                        bill_id: Some(created.key),
                    };
                    if slot.state == DraftState::FilePendingUpload {
                        slot.state = DraftState::FileUploaded;
                    }
                }
                Err(err) => {
                    if current && slot.state == DraftState::FilePendingUpload {
                        slot.state = DraftState::Error;
                    }
                    drop(slot);
                    feedback.report(Fault::Upload(err));
                }
            }
        })))
    }

    /// Issues the update and navigates to the bills list without waiting for it.
    ///
    /// The returned handle resolves once the Store answers; a rejection is
    /// reported through [`Feedback::report`]. The outcome only moves the draft
    /// state while no newer receipt has been picked. Without a store the state
    /// is left untouched. Must run inside a Tokio runtime.
    pub fn handle_submit(&self, form: &NewBillForm) -> Result<Option<JoinHandle<()>>, NewBillError> {
        let email = self.identity.current_user_email().unwrap_or_else(|| {
            warn!("no signed-in user email; submitting bill with an empty email");
            String::new()
        });
        let draft = self.draft();
        if draft.bill_id.is_none() {
            warn!("submitting before the receipt upload completed");
        }
        let data = build_payload(form, &draft, email).to_json()?;

        let handle = match self.store.clone() {
            Some(store) => {
                let generation = {
                    let mut slot = lock(&self.slot);
                    slot.state = DraftState::Submitting;
                    slot.upload_generation
                };
                let bill_id = draft.bill_id;
                let request = UpdateBillRequest {
                    data,
                    selector: bill_id.clone().unwrap_or_default(),
                };
                let slot = self.slot.clone();
                let feedback = self.feedback.clone();
                Some(tokio::spawn(async move {
                    let result = store.bills().update(request).await;
                    let mut slot = lock(&slot);
                    let current = slot.upload_generation == generation;
                    match result {
                        Ok(bill) => {
                            info!(bill_id = %bill.id, "bill submitted");
                            if current {
                                slot.state = DraftState::Submitted;
                            }
                        }
                        Err(error) => {
                            if current {
                                slot.state = DraftState::Error;
                            }
                            drop(slot);
                            feedback.report(Fault::Update { bill_id, error });
                        }
                    }
                }))
            }
            None => {
                debug!("no store configured; bill not submitted");
                None
            }
        };

        self.navigator.navigate_to(Route::Bills);
        Ok(handle)
    }
}

#[cfg(test)]
#[path = "tests/new_bill_tests.rs"]
mod tests;
