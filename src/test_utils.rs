use crate::PageSource;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ClientError(pub String);

/// Serves `1..=last_number` in pages of at most `page_size` numbers. The token is the index of
/// the first number of a page.
#[derive(Debug)]
pub struct NumbersClient {
    pub numbers: Vec<usize>,
    pub page_size: usize,
    pub buffer: Vec<usize>,
    pub calls: Vec<(usize, String)>,
    fail_on_call: Option<usize>,
}

impl NumbersClient {
    pub fn new(last_number: usize, page_size: usize) -> Self {
        NumbersClient {
            numbers: (1..=last_number).collect(),
            page_size,
            buffer: Vec::new(),
            calls: Vec::new(),
            fail_on_call: None,
        }
    }

    /// Makes the retrieval with the given 0-based call number fail after it has already
    /// buffered its page.
    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }
}

impl PageSource for NumbersClient {
    type Item = usize;
    type Buffer = Vec<usize>;
    type Error = ClientError;

    fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, ClientError> {
        let call = self.calls.len();
        self.calls.push((page_size, page_token.to_owned()));

        let index: usize = if page_token.is_empty() {
            0
        } else {
            page_token
                .parse()
                .map_err(|_| ClientError(format!("bad token {page_token:?}")))?
        };

        let take = match page_size {
            0 => self.page_size,
            requested => requested.min(self.page_size),
        };

        let end = (index + take).min(self.numbers.len());
        self.buffer.extend_from_slice(&self.numbers[index..end]);

        if self.fail_on_call == Some(call) {
            return Err(ClientError(format!("call {call} failed")));
        }

        if end < self.numbers.len() {
            Ok(end.to_string())
        } else {
            Ok(String::new())
        }
    }

    fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn drain_buffer(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.buffer)
    }
}

pub enum Response {
    Page(Vec<u32>, &'static str),
    /// Buffers the items and fails anyway
    Fail(Vec<u32>, &'static str),
}

/// Plays back a fixed list of responses. Pages are truncated to the requested size when it's not
/// 0. Once the script is over every retrieval returns an empty last page.
#[derive(Default)]
pub struct ScriptedSource {
    script: VecDeque<Response>,
    pub buffer: Vec<u32>,
    pub calls: Vec<(usize, String)>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Response>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn pages(pages: impl IntoIterator<Item = (Vec<u32>, &'static str)>) -> Self {
        Self::new(pages.into_iter().map(|(items, token)| Response::Page(items, token)))
    }
}

impl PageSource for ScriptedSource {
    type Item = u32;
    type Buffer = Vec<u32>;
    type Error = ClientError;

    fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, ClientError> {
        self.calls.push((page_size, page_token.to_owned()));

        let truncate = |mut items: Vec<u32>| {
            if page_size > 0 {
                items.truncate(page_size);
            }
            items
        };

        match self.script.pop_front() {
            Some(Response::Page(items, token)) => {
                self.buffer.extend(truncate(items));
                Ok(token.to_owned())
            }
            Some(Response::Fail(items, msg)) => {
                self.buffer.extend(truncate(items));
                Err(ClientError(msg.to_owned()))
            }
            None => Ok(String::new()),
        }
    }

    fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn drain_buffer(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.buffer)
    }
}
