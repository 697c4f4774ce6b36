pub mod orchestrator;

pub use orchestrator::{ClientContext, PaymentOrchestrator};
