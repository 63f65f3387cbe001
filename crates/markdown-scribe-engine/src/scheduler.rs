//! Background parsing.
//!
//! A [`ParseWorker`] owns one thread that parses text snapshots submitted
//! with the document version they belong to. Requests queue up while a parse
//! runs; the worker then parses only the newest one, so a burst of edits costs
//! one parse. Results come back as [`ParseOutcome`]s and are handed to
//! [`MarkdownDocument::install_parse`](crate::editing::MarkdownDocument::install_parse),
//! which drops any that no longer match the document.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel as chan;

use crate::parsing::Parser;
use crate::view::ParsedDocument;

struct ParseRequest {
    version: u64,
    text: String,
}

/// A finished parse and the version of the text it was produced from.
#[derive(Debug)]
pub struct ParseOutcome {
    pub version: u64,
    pub document: ParsedDocument,
}

/// Handle to the background parse thread. Dropping it stops the thread.
pub struct ParseWorker {
    request_tx: Option<chan::Sender<ParseRequest>>,
    outcome_rx: chan::Receiver<ParseOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl ParseWorker {
    pub fn spawn(parser: Parser) -> std::io::Result<Self> {
        let (request_tx, request_rx) = chan::unbounded::<ParseRequest>();
        let (outcome_tx, outcome_rx) = chan::unbounded::<ParseOutcome>();

        let handle = thread::Builder::new()
            .name("markdown-scribe-parse".to_string())
            .spawn(move || run(parser, request_rx, outcome_tx))?;

        Ok(Self {
            request_tx: Some(request_tx),
            outcome_rx,
            handle: Some(handle),
        })
    }

    /// Queue `text` for parsing. Returns false if the worker has stopped.
    pub fn submit(&self, version: u64, text: impl Into<String>) -> bool {
        let Some(tx) = &self.request_tx else {
            return false;
        };

        tx.send(ParseRequest {
            version,
            text: text.into(),
        })
        .is_ok()
    }

    /// Try to receive a finished parse without blocking.
    pub fn try_recv(&self) -> Option<ParseOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ParseOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for ParseWorker {
    fn drop(&mut self) {
        self.request_tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("parse worker panicked");
        }
    }
}

fn run(parser: Parser, requests: chan::Receiver<ParseRequest>, outcomes: chan::Sender<ParseOutcome>) {
    while let Ok(mut request) = requests.recv() {
        let mut superseded = 0;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            superseded += 1;
        }
        if superseded > 0 {
            log::debug!("skipped {superseded} superseded parse request(s)");
        }

        let document = parser.parse(&request.text);
        let outcome = ParseOutcome {
            version: request.version,
            document,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}
