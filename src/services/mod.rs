// Service layer for the device access gate

pub mod device_access;
pub mod device_store;
pub mod geo_provider;
pub mod location;
pub mod login_security_store;
pub mod messages;

pub use device_access::{
    AccessDecision, DeviceAccessError, DeviceAccessRequest, DeviceAccessService,
};
pub use device_store::{DeviceStore, FirstDeviceOutcome, PgDeviceStore, StoreError};
pub use geo_provider::{GeoLocation, GeoLookupError, GeoProvider, IpApiProvider};
pub use location::{LocationVerification, LocationVerificationService};
pub use login_security_store::{LoginSecurityStore, PgLoginSecurityStore};
pub use messages::Locale;
