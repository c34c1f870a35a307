// Utility modules

pub mod audit_logger;
pub mod service_error;
pub mod validation;

pub use audit_logger::{AuditAction, AuditLogger};
pub use service_error::ServiceError;
pub use validation::{trim_optional_field, validate_fingerprint};
