// Database models for the device access gate

pub mod access_log;
pub mod device;
pub mod notification;
pub mod suspicious_login;

pub use access_log::{AccessType, DeviceAccessLogEntry, NewDeviceAccessLogEntry};
pub use device::{NewUserDevice, UserDevice};
pub use notification::NewNotification;
pub use suspicious_login::{NewSuspiciousLoginAttempt, REVIEW_PENDING, SEVERITY_HIGH};
