//! Recording doubles for the controller seams.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use expense_shared::domain::{BillId, BillStatus, CreatedBill, RawBill};
use tokio::sync::Semaphore;

use crate::{
    error::StoreError,
    feedback::{Fault, Feedback},
    navigation::Navigator,
    store::{BillsResource, CreateBillRequest, Store, UpdateBillRequest},
};

pub fn raw_bill(id: &str, date: &str, status: BillStatus) -> RawBill {
    RawBill {
        id: BillId::new(id),
        name: Some(format!("bill {id}")),
        date: date.to_string(),
        status,
        ..RawBill::default()
    }
}

pub struct TestBillsResource {
    bills: Vec<RawBill>,
    list_fail_with: Option<StoreError>,
    create_result: Result<CreatedBill, StoreError>,
    update_fail_with: Option<StoreError>,
    create_gate: Option<Arc<Semaphore>>,
    update_gate: Option<Arc<Semaphore>>,
    pub list_calls: Mutex<u32>,
    pub create_calls: Mutex<Vec<CreateBillRequest>>,
    pub update_calls: Mutex<Vec<UpdateBillRequest>>,
}

impl TestBillsResource {
    pub fn with_bills(bills: Vec<RawBill>) -> Self {
        Self {
            bills,
            list_fail_with: None,
            create_result: Ok(CreatedBill {
                file_url: "https://localhost:3456/images/test.jpg".to_string(),
                key: BillId::new("1234"),
            }),
            update_fail_with: None,
            create_gate: None,
            update_gate: None,
            list_calls: Mutex::new(0),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_list(error: StoreError) -> Self {
        let mut resource = Self::with_bills(Vec::new());
        resource.list_fail_with = Some(error);
        resource
    }

    pub fn with_create_result(mut self, result: Result<CreatedBill, StoreError>) -> Self {
        self.create_result = result;
        self
    }

    pub fn failing_update(mut self, error: StoreError) -> Self {
        self.update_fail_with = Some(error);
        self
    }

    /// `create` waits for a permit on the returned semaphore before answering.
    pub fn gate_create(&mut self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.create_gate = Some(gate.clone());
        gate
    }

    pub fn gate_update(&mut self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.update_gate = Some(gate.clone());
        gate
    }

    pub fn list_count(&self) -> u32 {
        *self.list_calls.lock().expect("list calls")
    }

    pub fn creates(&self) -> Vec<CreateBillRequest> {
        self.create_calls.lock().expect("create calls").clone()
    }

    pub fn updates(&self) -> Vec<UpdateBillRequest> {
        self.update_calls.lock().expect("update calls").clone()
    }
}

async fn pass(gate: &Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.expect("gate open").forget();
    }
}

#[async_trait]
impl BillsResource for TestBillsResource {
    async fn list(&self) -> Result<Vec<RawBill>, StoreError> {
        *self.list_calls.lock().expect("list calls") += 1;
        if let Some(err) = &self.list_fail_with {
            return Err(err.clone());
        }
        Ok(self.bills.clone())
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill, StoreError> {
        self.create_calls.lock().expect("create calls").push(request);
        pass(&self.create_gate).await;
        self.create_result.clone()
    }

    async fn update(&self, request: UpdateBillRequest) -> Result<RawBill, StoreError> {
        let selector = request.selector.clone();
        self.update_calls.lock().expect("update calls").push(request);
        pass(&self.update_gate).await;
        if let Some(err) = &self.update_fail_with {
            return Err(err.clone());
        }
        Ok(RawBill {
            id: selector,
            status: BillStatus::Pending,
            ..RawBill::default()
        })
    }
}

pub struct TestStore {
    pub resource: Arc<TestBillsResource>,
}

impl TestStore {
    pub fn new(resource: TestBillsResource) -> Arc<Self> {
        Arc::new(Self {
            resource: Arc::new(resource),
        })
    }
}

impl Store for TestStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        self.resource.clone()
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    pub alerts: Mutex<Vec<String>>,
    pub faults: Mutex<Vec<Fault>>,
}

impl RecordingFeedback {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts").clone()
    }

    pub fn faults(&self) -> Vec<Fault> {
        self.faults.lock().expect("faults").clone()
    }
}

impl Feedback for RecordingFeedback {
    fn alert(&self, message: &str) {
        self.alerts.lock().expect("alerts").push(message.to_string());
    }

    fn report(&self, fault: Fault) {
        self.faults.lock().expect("faults").push(fault);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("paths").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn on_navigate(&self, pathname: &str) {
        self.paths.lock().expect("paths").push(pathname.to_string());
    }
}
