//! Service context, resource governor, recovery machine, host-call
//! bridge, and stateful-variable layer (spec §4.4–§4.7).

mod context;
mod driver;
mod error;
mod event;
mod governor;
mod recovery;
pub mod state;

pub use context::{ServiceContext, ServiceId};
pub use driver::HostDriver;
pub use error::{HostError, Result};
pub use event::{Event, EventLog};
pub use governor::{MeteringMode, ResourceGovernor};
pub use recovery::RecoveryMachine;
