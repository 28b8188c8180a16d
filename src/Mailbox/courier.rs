// src/Mailbox/courier.rs

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossbeam_utils::Backoff;

use crate::Core::RegisterInterface;
use crate::Mailbox::layout::{Mailbox, FLAG_IDLE};
use crate::Mailbox::Structs::Delivery;

/// The writer side of the mailbox.
///
/// Keeps received items in order and hands them to the game one at a time,
/// only when the mailbox reads empty. Fields are written before the flag, as
/// the poller requires.
pub struct Courier<R: RegisterInterface> {
    regs: R,
    mailbox_base: usize,
    queue: VecDeque<Delivery>,
    delivered: u64,
}

impl<R: RegisterInterface> Courier<R> {
    pub fn new(regs: R, mailbox_base: usize) -> Self {
        Self {
            regs,
            mailbox_base,
            queue: VecDeque::new(),
            delivered: 0,
        }
    }

    /// Queue an item for delivery.
    pub fn enqueue(&mut self, item_id: u32, sender_id: u32) {
        self.queue.push_back(Delivery::new(item_id, sender_id));
    }

    /// Items still waiting to be written.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Items written into the mailbox so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// True when the game has acknowledged the last message.
    pub fn mailbox_empty(&self) -> bool {
        self.mailbox().pending_raw() == FLAG_IDLE
    }

    /// Write the next queued item if the mailbox is empty.
    ///
    /// Returns whether a message was written. The item leaves the queue only
    /// once its flag is raised.
    pub fn try_deliver(&mut self) -> bool {
        let Some(next) = self.queue.front().copied() else {
            return false;
        };
        if !self.mailbox_empty() {
            return false;
        }

        let mailbox = self.mailbox();
        mailbox.set_item_id(next.item_id);
        mailbox.set_sender_id(next.sender_id);
        mailbox.set_pending(true);

        self.queue.pop_front();
        self.delivered += 1;
        log::debug!(
            "delivered item {} from sender {} ({} queued)",
            next.item_id,
            next.sender_id,
            self.queue.len()
        );
        true
    }

    /// Deliver the next queued item, waiting up to `timeout` for the
    /// mailbox to drain.
    ///
    /// # Returns
    /// * `Ok(())` once the item is written (or if nothing was queued)
    /// * `Err(TimedOut)` if the game never acknowledged the previous message
    pub fn deliver_blocking(&mut self, timeout: Duration) -> io::Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let start = Instant::now();
        let backoff = Backoff::new();
        loop {
            if self.try_deliver() {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("mailbox still pending after {:?}", timeout),
                ));
            }
            if backoff.is_completed() {
                std::thread::sleep(Duration::from_millis(1));
            } else {
                backoff.snooze();
            }
        }
    }

    pub fn mailbox(&self) -> Mailbox<'_, R> {
        Mailbox::new(&self.regs, self.mailbox_base)
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }
}
