mod config;
mod connector;
mod error;
mod events;
mod runtime;
mod scheduler;
mod session;

pub use config::{CoachEnv, SessionConfig, TriggerConfig};
pub use connector::{BoxFuture, ListenConnector, StreamConnector, StreamHandle};
pub use error::Error;
pub use events::{
    SessionDataEvent, SessionErrorEvent, SessionLifecycleEvent, SessionSnapshot, State,
};
pub use runtime::{CoachRuntime, TracingRuntime};
pub use scheduler::{ForceRejected, Phase, TriggerScheduler};
pub use session::{start_session, SessionHandle};
