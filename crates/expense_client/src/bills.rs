//! Employee bills list: fetch, format each record in isolation, order for display.

use std::sync::Arc;

use expense_shared::routes::Route;
use tracing::{debug, info};

use crate::{
    error::StoreError,
    feedback::{Fault, Feedback},
    format::{format_bill, sort_most_recent_first, DisplayBill},
    navigation::Navigator,
    store::Store,
};

/// What the bills view renders.
#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    Loading,
    Error(String),
    Loaded(Vec<DisplayBill>),
}

/// What the host's receipt modal needs to show a bill's attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptPreview {
    pub file_url: String,
    pub image_width: u32,
}

pub struct BillsController {
    store: Option<Arc<dyn Store>>,
    navigator: Arc<dyn Navigator>,
    feedback: Arc<dyn Feedback>,
}

impl BillsController {
    pub fn new(
        store: Option<Arc<dyn Store>>,
        navigator: Arc<dyn Navigator>,
        feedback: Arc<dyn Feedback>,
    ) -> Self {
        Self {
            store,
            navigator,
            feedback,
        }
    }

    /// Bills in Store order, or `None` when no Store is configured.
    ///
    /// A record whose formatting fails is reported and kept with its raw
    /// values; only a failed `list` call fails the whole fetch.
    pub async fn get_bills(&self) -> Result<Option<Vec<DisplayBill>>, StoreError> {
        let Some(store) = &self.store else {
            debug!("no store configured; skipping bills fetch");
            return Ok(None);
        };

        let raw_bills = store.bills().list().await?;
        let bills = raw_bills
            .into_iter()
            .map(|raw| match format_bill(&raw) {
                Ok(bill) => bill,
                Err(error) => {
                    self.feedback.report(Fault::Format {
                        bill_id: raw.id.clone(),
                        error,
                    });
                    DisplayBill::unformatted(raw)
                }
            })
            .collect::<Vec<_>>();
        debug!(count = bills.len(), "bills formatted");
        Ok(Some(bills))
    }

    /// Bills most recent first, or the error message to render in their place.
    pub async fn load_page(&self) -> BillsPage {
        match self.get_bills().await {
            Ok(Some(mut bills)) => {
                sort_most_recent_first(&mut bills);
                BillsPage::Loaded(bills)
            }
            Ok(None) => BillsPage::Loading,
            Err(err) => {
                info!(error = %err, "bills page failed to load");
                BillsPage::Error(err.to_string())
            }
        }
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate_to(Route::NewBill);
    }

    /// The receipt image takes half the modal width.
    pub fn handle_click_icon_eye(&self, file_url: &str, modal_width: u32) -> ReceiptPreview {
        ReceiptPreview {
            file_url: file_url.to_string(),
            image_width: modal_width / 2,
        }
    }
}

#[cfg(test)]
#[path = "tests/bills_tests.rs"]
mod tests;
