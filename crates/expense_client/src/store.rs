//! Contract of the remote bills Store as the controllers consume it.

use std::sync::Arc;

use async_trait::async_trait;
use expense_shared::domain::{BillId, CreatedBill, RawBill};

use crate::error::StoreError;

/// A receipt picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            bytes,
        }
    }
}

/// Multipart upload sent by `create`. The transport chooses the content type
/// and boundary; callers never set one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBillRequest {
    pub file: ReceiptFile,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBillRequest {
    /// JSON-encoded bill payload.
    pub data: String,
    pub selector: BillId,
}

#[async_trait]
pub trait BillsResource: Send + Sync {
    async fn list(&self) -> Result<Vec<RawBill>, StoreError>;
    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill, StoreError>;
    async fn update(&self, request: UpdateBillRequest) -> Result<RawBill, StoreError>;
}

pub trait Store: Send + Sync {
    fn bills(&self) -> Arc<dyn BillsResource>;
}
