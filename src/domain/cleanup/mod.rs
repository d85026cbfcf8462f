pub mod services;

pub use services::{CleanupPolicy, CleanupService, SweepReport};
