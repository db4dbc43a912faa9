//! In-process stand-in for the remote API.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use brewlog_core::gateway::{GatewayError, GatewayResponse, Method, RemoteGateway};
use serde_json::{json, Value};
use tokio::sync::Notify;

#[derive(Default)]
struct State {
    records: HashMap<String, Vec<Value>>,
    offline: bool,
    rejected_names: HashSet<String>,
    unreachable_names: HashSet<String>,
    requests: Vec<(Method, String)>,
    hold_next: Option<Arc<Notify>>,
}

/// Fake REST API storing records per endpoint, with failure injection.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the remote collection at `endpoint` (`tea`, `brewing_session`, ...).
    pub fn seed(&self, endpoint: &str, records: Vec<Value>) {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(endpoint.to_string(), records);
    }

    pub fn records(&self, endpoint: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the `name` of the remote record with server id `id`.
    pub fn rename(&self, endpoint: &str, id: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(record) = state
            .records
            .get_mut(endpoint)
            .and_then(|records| records.iter_mut().find(|record| record["id"] == id))
        {
            record["name"] = json!(name);
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Answer 400 to any body whose `name` is `name`.
    pub fn reject_name(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_names
            .insert(name.to_string());
    }

    /// Time out on any body whose `name` is `name`.
    pub fn drop_name(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .unreachable_names
            .insert(name.to_string());
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Delay the response of the next request until the returned handle is notified.
    ///
    /// The response is computed before waiting, so it reflects the remote
    /// state at the time the request arrived.
    pub fn hold_next_request(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state.lock().unwrap().hold_next = Some(Arc::clone(&notify));
        notify
    }

    fn respond(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
    ) -> Result<GatewayResponse, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((method, endpoint.to_string()));
        if state.offline {
            return Err(GatewayError::Unreachable("connection refused".to_string()));
        }

        let mut segments = endpoint.trim_matches('/').split('/');
        let collection = segments.next().unwrap_or_default().to_string();
        let id = segments.next().map(str::to_string);
        let body: Option<Value> = body.map(|body| serde_json::from_str(&body).unwrap());

        if let Some(name) = body.as_ref().and_then(|body| body["name"].as_str()) {
            if state.rejected_names.contains(name) {
                return Err(GatewayError::Rejected {
                    status: 400,
                    detail: r#"{"name":["This field is invalid."]}"#.to_string(),
                });
            }
            if state.unreachable_names.contains(name) {
                return Err(GatewayError::Unreachable("request timed out".to_string()));
            }
        }

        let records = state.records.entry(collection).or_default();
        match (method, id, body) {
            (Method::Get, None, _) => Ok(GatewayResponse::new(
                200,
                Value::Array(records.clone()).to_string(),
            )),
            (Method::Post, None, Some(mut body)) => {
                body["id"] = json!(uuid::Uuid::new_v4().to_string());
                records.push(body.clone());
                Ok(GatewayResponse::new(201, body.to_string()))
            }
            (Method::Put, Some(id), Some(mut body)) => {
                let Some(record) = records.iter_mut().find(|record| record["id"] == id.as_str())
                else {
                    return Err(GatewayError::Unreachable("HTTP 404".to_string()));
                };
                if record.get("image").is_some() && body.get("image").is_none() {
                    body["image"] = record["image"].clone();
                }
                body["id"] = json!(id);
                *record = body.clone();
                Ok(GatewayResponse::new(200, body.to_string()))
            }
            (Method::Delete, Some(id), _) => {
                records.retain(|record| record["id"] != id.as_str());
                Ok(GatewayResponse::new(204, ""))
            }
            (method, _, _) => Err(GatewayError::Rejected {
                status: 400,
                detail: format!("unsupported {method} {endpoint}"),
            }),
        }
    }
}

impl RemoteGateway for FakeApi {
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
    ) -> Result<GatewayResponse, GatewayError> {
        let hold = self.state.lock().unwrap().hold_next.take();
        let response = self.respond(endpoint, method, body);
        if let Some(hold) = hold {
            hold.notified().await;
        }
        response
    }
}
