//! Push channel: receives the session id and a status string from the server
//! and reconnects after a fixed delay whenever the connection drops.

mod channel;
mod connector;
mod error;
mod frame;

pub use channel::{
    ChannelHandle, ChannelState, SessionChannel, DEFAULT_RECONNECT_DELAY, STATUS_CONNECTED,
    STATUS_RECONNECTING,
};
pub use connector::{Connector, FrameStream, WsConnector};
pub use error::ChannelError;
pub use frame::{handle_text, SessionFrame};
