//! In-process listings source for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ListingsSource, UpstreamResponse};
use crate::error::Result;
use crate::models::QueryDescriptor;

/// Answers every search with a fixed reply and counts the calls.
#[derive(Debug)]
pub(crate) struct ScriptedSource {
    reply: Mutex<UpstreamResponse>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, QueryDescriptor)>>,
}

impl ScriptedSource {
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Mutex::new(UpstreamResponse::new(status, body)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn set_reply(&self, status: u16, body: impl Into<String>) {
        *self.reply.lock().unwrap() = UpstreamResponse::new(status, body);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<(String, QueryDescriptor)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingsSource for ScriptedSource {
    async fn search(&self, api_key: &str, descriptor: &QueryDescriptor) -> Result<UpstreamResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((api_key.to_string(), descriptor.clone()));
        Ok(self.reply.lock().unwrap().clone())
    }
}
