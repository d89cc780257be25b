//! PhantomFlow load-generation engine
//!
//! A fixed pool of workers shares one pooled HTTP client. Each worker loops
//! over synthesize, dispatch and count until its stop condition holds, while
//! a progress reporter samples the shared counters once per interval.

pub mod coordinator;
pub mod counters;
pub mod diagnostics;
pub mod dispatcher;
pub mod errors;
pub mod pool;
pub mod progress;
pub mod settings;
pub mod summary;
pub mod timezone;
pub mod worker;

pub use coordinator::*;
pub use counters::*;
pub use dispatcher::*;
pub use errors::*;
pub use pool::*;
pub use progress::*;
pub use settings::*;
pub use summary::*;
pub use timezone::*;
pub use worker::*;
