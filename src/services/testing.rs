//! Scripted transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::error::{AppError, AppResult};
use crate::services::http::{ApiRequest, ApiResponse, HttpTransport};

enum Scripted {
    Ready(AppResult<ApiResponse>),
    Gated(oneshot::Receiver<AppResult<ApiResponse>>),
}

/// Returns queued responses in order and records every request sent.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Rc<RefCell<VecDeque<Scripted>>>,
    sent: Rc<RefCell<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(ApiResponse::new(status, body.to_string()))));
        self
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(ApiResponse::new(status, body))));
        self
    }

    pub fn fail_network(&self) -> &Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Err(AppError::transport(
                None,
                "Network error: connection refused",
            ))));
        self
    }

    /// Queue a response released later through the returned sender.
    pub fn gate(&self) -> oneshot::Sender<AppResult<ApiResponse>> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.sent.borrow().last().cloned()
    }
}

pub fn ok(status: u16, body: serde_json::Value) -> AppResult<ApiResponse> {
    Ok(ApiResponse::new(status, body.to_string()))
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        self.sent.borrow_mut().push(request.clone());
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(AppError::transport(None, "gate dropped"))),
            None => panic!("unexpected request: {}", request.describe()),
        }
    }
}
