//! Reseller interface protocol.
//!
//! Commands go out as query strings over HTTP GET; replies come back as XML
//! and are parsed into a generic tree before any interpretation.

/// Command construction and query-string encoding
pub mod command;

/// Registration reply normalization
pub mod normalize;

/// XML reply tree
pub mod reply;

/// HTTP transport seam
pub mod transport;

pub use command::{split_domain, RegistrarCommand};
pub use normalize::normalize_registration;
pub use reply::{RegistrarReply, ReplyMap, ReplyValue, INTERFACE_RESPONSE};
pub use transport::{HttpTransport, Transport};
