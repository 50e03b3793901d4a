use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::errors::{InPostError, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Transport replaying canned responses in order and recording every request
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<ApiResponse>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.responses.lock().unwrap().push_back(ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: serde_json::to_vec(&body).unwrap(),
        });
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Parsed JSON body of the `index`th request
    pub(crate) fn body_json(&self, index: usize) -> serde_json::Value {
        let body = self.requests()[index].body.clone().unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| InPostError::InvalidResponse("no scripted response left".to_string()))
    }
}
