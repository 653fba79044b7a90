//! In-memory transport that replays canned responses in order.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

pub(crate) fn count_json(id: i64, value: i64) -> String {
    format!(r#"{{"id":{id},"value":{value},"updatedAt":"2024-01-01T00:00:00Z"}}"#)
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
    }

    pub(crate) fn respond_list(&self, counts: &[(i64, i64)]) {
        let items: Vec<String> = counts.iter().map(|&(id, value)| count_json(id, value)).collect();
        self.respond(200, &format!(r#"{{"success":true,"data":[{}]}}"#, items.join(",")));
    }

    pub(crate) fn respond_count(&self, id: i64, value: i64) {
        self.respond(200, &format!(r#"{{"success":true,"data":{}}}"#, count_json(id, value)));
    }

    /// No response comes back.
    pub(crate) fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::NoResponse(message.into())));
    }

    /// The request is refused before it is sent.
    pub(crate) fn reject(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::Request(message.into())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies.borrow_mut().pop_front().unwrap_or_else(|| {
            let message = format!("no scripted reply for {} {}", request.method, request.path);
            Err(TransportError::NoResponse(message.into()))
        })
    }
}
