//! Item mailbox between a randomizer client and a running game.
//!
//! The client (writer) leaves one item at a time in a fixed memory window and
//! raises a pending flag; the game calls [`Mailbox::Poller::poll`] once per
//! frame, which applies the item's effect to game state and clears the flag.

// Module naming follows project convention
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod Mailbox;
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}
pub mod ffi;
