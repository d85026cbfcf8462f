pub mod file_fallback;
pub mod resend_gateway;

pub use file_fallback::FileDeliveryFallback;
pub use resend_gateway::ResendGateway;
