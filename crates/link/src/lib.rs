//! Link module - remote key input over TCP with a JSON protocol
//!
//! Lets a remote peer (a test harness, a phone, another process) press keys on
//! the appliance and follow its progress. Keys arrive as pre-classified taps, so
//! the center control always has short-press semantics over the link; send
//! `enter` to confirm.
//!
//! # Protocol Overview
//!
//! Line-delimited JSON over TCP (default: 127.0.0.1:7878):
//!
//! 1. **Connection**: the server sends `welcome` with the board geometry
//! 2. **Keys**: the client sends `key` messages by name or transport word
//! 3. **Acks**: each accepted key is acknowledged once it entered the key
//!    channel; a full channel delays the ack (and further reads) instead of
//!    dropping the key
//! 4. **Status**: every published snapshot is reported as a `status` line
//!
//! # Environment Variables
//!
//! - `LIFE_LINK_HOST`: Bind address (default: "127.0.0.1")
//! - `LIFE_LINK_PORT`: Port number (default: 7878)
//! - `LIFE_LINK_DISABLED`: Set to "1" or "true" to disable the link entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Server -> Client: {"type":"welcome","seq":0,"ts":1234567890,"rows":18,"cols":32,"ratio":40,"mode":"editing"}
//! Client -> Server: {"type":"key","seq":1,"key":"space"}
//! Server -> Client: {"type":"ack","seq":1,"ts":1234567891}
//! Server -> Client: {"type":"status","seq":1,"ts":1234567891,"generation":0,"mode":"editing","alive":1}
//! Client -> Server: {"type":"key","seq":2,"key":42}
//! Server -> Client: {"type":"error","seq":2,"ts":1234567892,"code":"unknown_key","message":"unknown key 42"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"key","seq":1,"key":"right"}
//! ```

pub mod protocol;
pub mod server;

pub use life_core as core;
pub use life_engine as engine;
pub use life_types as types;

pub use protocol::*;
pub use server::{run_server, LinkConfig, LinkHandles, DEFAULT_LINK_HOST, DEFAULT_LINK_PORT};
