//! Client-side controllers of the expense report tool and the Store they talk to.

pub mod bills;
pub mod error;
pub mod feedback;
pub mod format;
pub mod http_store;
pub mod identity;
pub mod navigation;
pub mod new_bill;
pub mod store;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use bills::{BillsController, BillsPage, ReceiptPreview};
pub use error::{FormatError, NewBillError, StoreError};
pub use feedback::{Fault, Feedback};
pub use format::DisplayBill;
pub use http_store::HttpStore;
pub use identity::{
    IdentityProvider, MemorySessionStore, SessionIdentity, SessionStore, SessionUser, StaticIdentity,
};
pub use navigation::Navigator;
pub use new_bill::{DraftState, NewBillController, NewBillDraft, NewBillForm};
pub use store::{BillsResource, CreateBillRequest, ReceiptFile, Store, UpdateBillRequest};
