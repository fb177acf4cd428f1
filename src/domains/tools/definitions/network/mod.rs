//! Network tools.
//!
//! - `ip`: reports the calling client's IP address (`get_ip`)
//! - `ip_data`: IP geolocation report (`get_ip_data`)
//! - `geolocation`: the ip-api.com adapter shared with the weather tools

pub mod geolocation;
pub mod ip;
pub mod ip_data;

pub use geolocation::{GeolocationLookup, GeolocationResult, IpApiClient};
pub use ip::GetIpTool;
pub use ip_data::{GetIpDataParams, GetIpDataTool};
