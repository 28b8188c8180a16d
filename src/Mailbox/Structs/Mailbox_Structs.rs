// Plain value types read out of the mailbox; no register access here.

/// Point-in-time copy of every mailbox word.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MailboxSnapshot {
    pub shard_mirror: u32,
    pub pending_flag: u32,
    pub item_id: u32,
    pub sender_id: u32,
    pub debug_heartbeat: u32,
    pub debug_last_item_id: u32,
    pub debug_last_sender: u32,
}

/// A message as the writer leaves it in the mailbox.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Delivery {
    pub item_id: u32,
    pub sender_id: u32,
}

impl Delivery {
    pub fn new(item_id: u32, sender_id: u32) -> Self {
        Self { item_id, sender_id }
    }
}
