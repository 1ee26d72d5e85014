//! REST implementation of the bills Store.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use expense_shared::{
    domain::{BillId, CreatedBill, RawBill},
    protocol::ApiErrorBody,
};
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client, Response,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::StoreError,
    store::{BillsResource, CreateBillRequest, Store, UpdateBillRequest},
};

pub struct HttpStore {
    bills: Arc<HttpBillsResource>,
}

impl HttpStore {
    pub fn new(api_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(api_url, Client::new())
    }

    pub fn with_timeout(api_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(api_url, http).map_err(|err| StoreError::Transport(err.to_string()))
    }

    pub fn with_client(api_url: &str, http: Client) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(api_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let bills_url = base.join("bills")?;
        Ok(Self {
            bills: Arc::new(HttpBillsResource { http, bills_url }),
        })
    }
}

impl Store for HttpStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        self.bills.clone()
    }
}

pub struct HttpBillsResource {
    http: Client,
    bills_url: Url,
}

impl HttpBillsResource {
    fn bill_url(&self, selector: &BillId) -> Result<Url, StoreError> {
        let mut url = self.bills_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("{} cannot be a base url", self.bills_url)))?
            .push(selector.as_str());
        Ok(url)
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .map(|body| body.message);
    warn!(status = status.as_u16(), detail = ?detail, "store request rejected");
    Err(StoreError::Status {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl BillsResource for HttpBillsResource {
    async fn list(&self) -> Result<Vec<RawBill>, StoreError> {
        let response = self.http.get(self.bills_url.clone()).send().await?;
        let bills: Vec<RawBill> = ensure_success(response).await?.json().await?;
        debug!(count = bills.len(), "fetched bills");
        Ok(bills)
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill, StoreError> {
        let CreateBillRequest { file, email } = request;
        let mut part = Part::bytes(file.bytes).file_name(file.name);
        if let Some(mime_type) = file.mime_type.as_deref() {
            part = part.mime_str(mime_type)?;
        }
        let mut form = Form::new().part("file", part);
        if let Some(email) = email {
            form = form.text("email", email);
        }

        let response = self
            .http
            .post(self.bills_url.clone())
            .multipart(form)
            .send()
            .await?;
        let created: CreatedBill = ensure_success(response).await?.json().await?;
        debug!(bill_id = %created.key, "receipt uploaded");
        Ok(created)
    }

    async fn update(&self, request: UpdateBillRequest) -> Result<RawBill, StoreError> {
        let response = self
            .http
            .patch(self.bill_url(&request.selector)?)
            .header(CONTENT_TYPE, "application/json")
            .body(request.data)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/http_store_tests.rs"]
mod tests;
