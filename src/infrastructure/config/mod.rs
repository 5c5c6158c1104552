//! Infrastructure configuration modules.

pub mod cache;
pub mod history;
pub mod logging;
pub mod queue;
pub mod settings;
pub mod trend;
pub mod upstream;

pub use settings::Config;
