pub use channel::Rx;
pub use lift::{from_future, of, rejected, resolved};
pub use settle::Settle;
pub use task::Deferred;

pub(crate) use lift::spawn;
pub(crate) use settle::guard;

mod channel;
mod lift;
mod settle;
mod task;
