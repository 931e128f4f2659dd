// In-memory transport for unit tests: replays canned responses in order and
// records every request it was asked to send.

use crate::api::{Request, Response, Transport};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Response>>,
    sent: RefCell<Vec<(Request, Option<String>)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl AsRef<[u8]>) -> Self {
        self.replies.borrow_mut().push_back(Response {
            status,
            body: body.as_ref().to_vec(),
        });
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.sent.borrow().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.sent.borrow().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn calls(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &Request, token: Option<&str>) -> Result<Response> {
        self.sent
            .borrow_mut()
            .push((request.clone(), token.map(str::to_string)));
        let reply = self.replies.borrow_mut().pop_front();
        Ok(reply.expect("FakeTransport ran out of canned replies"))
    }
}
