//! msgframe - bridge between a visual-programming tool and a render loop.
//!
//! A background HTTP listener accepts short text messages and keeps the
//! latest one in a shared cell; a synchronous render call turns the current
//! message into one centered-text RGB frame on demand. The two sides run on
//! independent schedules and share nothing but that one cell.

pub mod config;
pub mod http;
pub mod protocol;
pub mod render;
pub mod server;
pub mod state;

pub use config::ListenerConfig;
pub use render::{Frame, Renderer};
pub use server::MessageListener;
pub use state::SharedMessage;
