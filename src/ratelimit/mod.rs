//! Rate limiting logic and state management.

mod clock;
mod key;
mod limiter;
mod policy;
mod registry;
mod window;

pub use clock::{Clock, SystemClock};
pub use key::{derive_key, Scope, UnknownScope, ANON_SUBJECT};
pub use limiter::FixedWindowLimiter;
pub use policy::{Policy, PolicySet};
pub use registry::LimiterRegistry;
pub use window::{Decision, WindowRecord};
