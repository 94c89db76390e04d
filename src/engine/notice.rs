// src/engine/notice.rs

//! Where progress notices go.
//!
//! The scheduler talks to a [`NoticeSink`] instead of printing directly, so
//! the CLI can print to stdout while other consumers (tests, a UI) receive
//! the same stream.

use tokio::sync::mpsc;

use crate::types::Notice;

pub trait NoticeSink: Send {
    fn emit(&mut self, notice: Notice);
}

/// Prints each notice on its own line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotices;

impl NoticeSink for StdoutNotices {
    fn emit(&mut self, notice: Notice) {
        println!("{notice}");
    }
}

/// Forwards notices to an unbounded channel.
///
/// Notices are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotices {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotices {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NoticeSink for ChannelNotices {
    fn emit(&mut self, notice: Notice) {
        let _ = self.tx.send(notice);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotices;

impl NoticeSink for NullNotices {
    fn emit(&mut self, _notice: Notice) {}
}
