/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{trace, warn};

use crate::message::Message;

/// An unbounded first-in, first-out queue of [`Message`]s.
///
/// `Mailbox` is a shared reference: cloning it yields another handle to the
/// *same* channel. This is what lets one agent's outbox point at another agent's
/// inbox. Any number of producers may [`put`](Self::put) concurrently; a
/// single consumer is expected to [`get`](Self::get).
///
/// Insertion order equals removal order, and the mailbox itself never drops
/// or duplicates a message.
#[derive(Clone)]
pub struct Mailbox {
    sender: UnboundedSender<Message>,
    receiver: Arc<Mutex<UnboundedReceiver<Message>>>,
    queued: Arc<AtomicUsize>,
}

impl Mailbox {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            queued: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Appends a message at the tail. Never blocks and never fails.
    pub fn put(&self, message: Message) {
        trace!(kind = %message.kind(), "mailbox put");
        self.queued.fetch_add(1, Ordering::SeqCst);
        if let Err(error) = self.sender.send(message) {
            // Only reachable once every receiver handle is gone.
            self.queued.fetch_sub(1, Ordering::SeqCst);
            warn!(kind = %error.0.kind(), "mailbox closed; message dropped");
        }
    }

    /// Removes and returns the head, suspending while the mailbox is empty.
    ///
    /// Cancel-safe: a message leaves the queue only when this future completes,
    /// so dropping a pending `get` loses nothing.
    pub async fn get(&self) -> Message {
        let mut receiver = self.receiver.lock().await;
        match receiver.recv().await {
            Some(message) => {
                self.queued.fetch_sub(1, Ordering::SeqCst);
                message
            }
            // `self` holds a sender, so the channel cannot close under us.
            None => std::future::pending().await,
        }
    }

    /// Removes and returns the head without suspending.
    ///
    /// Returns `None` when the mailbox is empty, or while another caller is
    /// suspended in [`get`](Self::get).
    #[must_use]
    pub fn try_get(&self) -> Option<Message> {
        let mut receiver = self.receiver.try_lock().ok()?;
        let message = receiver.try_recv().ok()?;
        self.queued.fetch_sub(1, Ordering::SeqCst);
        Some(message)
    }

    /// Returns the number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Returns `true` when no message is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when both handles address the same channel.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.sender.same_channel(&other.sender)
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn numbered(n: usize) -> Message {
        Message::new("test", n.to_string())
    }

    #[tokio::test]
    async fn preserves_insertion_order() {
        let mailbox = Mailbox::new();
        for n in 0..10 {
            mailbox.put(numbered(n));
        }
        for n in 0..10 {
            assert_eq!(mailbox.get().await, numbered(n));
        }
        assert!(mailbox.is_empty());
    }

    #[tokio::test]
    async fn clones_share_one_queue() {
        let inbox = Mailbox::new();
        let outbox = inbox.clone();
        outbox.put(numbered(1));
        assert!(inbox.same_as(&outbox));
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.try_get(), Some(numbered(1)));
        assert!(!inbox.same_as(&Mailbox::new()));
    }

    #[tokio::test]
    async fn get_suspends_until_put() {
        let mailbox = Mailbox::new();
        let producer = mailbox.clone();
        let waiting = tokio::spawn(async move { mailbox.get().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        producer.put(numbered(7));
        assert_eq!(waiting.await.unwrap(), numbered(7));
    }

    #[tokio::test]
    async fn dropped_get_loses_nothing() {
        let mailbox = Mailbox::new();
        let pending = tokio::time::timeout(Duration::from_millis(10), mailbox.get()).await;
        assert!(pending.is_err());

        mailbox.put(numbered(3));
        assert_eq!(mailbox.get().await, numbered(3));
    }

    #[test]
    fn try_get_on_empty_is_none() {
        assert_eq!(Mailbox::new().try_get(), None);
    }

    #[tokio::test]
    async fn len_follows_puts_and_gets() {
        let mailbox = Mailbox::new();
        mailbox.put(numbered(1));
        mailbox.put(numbered(2));
        assert_eq!(mailbox.len(), 2);
        let _ = mailbox.get().await;
        assert_eq!(mailbox.len(), 1);
        let _ = mailbox.try_get();
        assert!(mailbox.is_empty());
    }
}
