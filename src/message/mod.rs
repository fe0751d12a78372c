//! Message-related types (`MessageKind`, `Message`, `Value`).

mod kind;
mod msg;
mod value;

pub use kind::MessageKind;
pub use msg::Message;
pub use value::Value;
