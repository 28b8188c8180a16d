mod builder;
mod debug;
mod courier;
mod poller;
mod watcher;

pub use builder::MailboxBuilder;
pub use courier::Courier;
pub use poller::{PollOutcome, Poller};
pub use watcher::{ShardSet, ShardWatcher};

pub mod effects;
pub mod layout;

pub use effects::{Effect, ItemEntry, ItemTable, Revision, BASE_OFFSET};
pub use layout::{DeviceMap, Mailbox, MailboxLayout, MAILBOX_BASE};

pub mod Structs {
    pub mod Mailbox_Structs;
    pub use Mailbox_Structs::{Delivery, MailboxSnapshot}; // re-export for stable path
}
