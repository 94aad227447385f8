//! Shared fixtures for the integration specs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{json, Value};

use scilog::models::{AclValue, Logbook};
use scilog::scilog::{ClientError, FileUpload, Transport};

/// A request seen by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        path: String,
        filter: Option<Value>,
    },
    Post {
        path: String,
        payload: Value,
    },
    PostFile {
        path: String,
        file_name: String,
        content_type: String,
        content: Vec<u8>,
        fields: Value,
    },
    Patch {
        path: String,
        payload: Value,
    },
}

/// In-memory stand-in for the SciLog server.
///
/// Creates echo the payload back with a generated `id`; uploads add an
/// `accessHash`. Every request is recorded in order.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    list_response: Mutex<Value>,
    /// Fail the upload with this (1-based) index.
    failing_upload: Option<usize>,
}

impl RecordingTransport {
    pub fn with_list_response(response: Value) -> Self {
        Self {
            list_response: Mutex::new(response),
            ..Default::default()
        }
    }

    pub fn failing_upload(n: usize) -> Self {
        Self {
            failing_upload: Some(n),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Post { payload, .. } => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::PostFile { .. }))
            .collect()
    }

    pub fn patches(&self) -> Vec<(String, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Patch { path, payload } => Some((path, payload)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }
}

fn with_fields(base: &Value, extra: Value) -> Value {
    let mut object = base.as_object().cloned().unwrap_or_default();
    if let Value::Object(extra) = extra {
        object.extend(extra);
    }
    Value::Object(object)
}

impl Transport for RecordingTransport {
    async fn get(&self, path: &str, filter: Option<&str>) -> Result<Value, ClientError> {
        self.record(Call::Get {
            path: path.to_string(),
            filter: filter.map(|f| serde_json::from_str(f).expect("filter is JSON")),
        });
        Ok(self.list_response.lock().unwrap().clone())
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, ClientError> {
        let n = self.record(Call::Post {
            path: path.to_string(),
            payload: payload.clone(),
        });
        Ok(with_fields(
            payload,
            json!({
                "id": format!("snippet-{}", n),
                "createdAt": "2024-03-01T12:00:00Z",
                "createdBy": "tester@psi.ch",
            }),
        ))
    }

    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<Value, ClientError> {
        let fields = Value::Object(upload.fields);
        self.record(Call::PostFile {
            path: path.to_string(),
            file_name: upload.file_name,
            content_type: upload.content_type,
            content: upload.content,
            fields: fields.clone(),
        });
        let n = self.uploads().len();
        if self.failing_upload == Some(n) {
            return Err(ClientError::Server("507 Insufficient Storage".to_string()));
        }
        Ok(with_fields(
            &fields,
            json!({
                "id": format!("file-{}", n),
                "accessHash": format!("hash-{}", n),
            }),
        ))
    }

    async fn patch(&self, path: &str, payload: &Value) -> Result<Value, ClientError> {
        self.record(Call::Patch {
            path: path.to_string(),
            payload: payload.clone(),
        });
        Ok(Value::Null)
    }
}

/// Logbook `L1` readable by `g1`, with an empty update ACL.
pub fn pinned_logbook() -> Logbook {
    let mut logbook = Logbook::default();
    logbook.base.id.set("L1".to_string());
    logbook.name.set("Beamtime".to_string());
    logbook.base.owner_group.set("p12345".to_string());
    logbook.base.read_acl.set(AclValue::groups(["g1"]));
    logbook.base.update_acl.set(AclValue::groups(Vec::<String>::new()));
    logbook
}

pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}
