pub mod constant_time;
pub mod mac;

pub use constant_time::eq_64;
pub use mac::{mac, verify, Tag, TAG_SIZE};
