//! Game of Life appliance (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as one
//! `life_appliance::{core,engine,input,link,types,video}` API.

pub use life_core as core;
pub use life_engine as engine;
pub use life_input as input;
pub use life_link as link;
pub use life_types as types;
pub use life_video as video;
