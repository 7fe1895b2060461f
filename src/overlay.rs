//! Overlay network type validation.
//!
//! The `overlay-network-type` option is free text: a whitespace-separated
//! list of tunneling technologies for tenant network isolation. The Arista
//! driver only supports a subset of what ML2 knows about, so the raw value
//! is validated here before it reaches any rendered configuration.

use crate::error::{CharmError, Result};

pub const VLAN: &str = "vlan";
pub const VXLAN: &str = "vxlan";
pub const GRE: &str = "gre";

/// Overlay network types the driver currently supports.
///
/// vxlan and gre are recognized ML2 type drivers but are not yet wired up
/// for this mechanism driver, so they are rejected at validation time.
pub const OVERLAY_NET_TYPES: &[&str] = &[VLAN];

/// Validate a raw `overlay-network-type` value.
///
/// Splits the input on whitespace and checks each token against
/// [`OVERLAY_NET_TYPES`]. The first disallowed token fails with
/// `UnsupportedOverlayType` naming the token. Valid input is rejoined with
/// `,` preserving order and duplicates, ready for the rendered config.
///
/// Empty input has no tokens to validate and yields the empty string.
pub fn validate_overlay_network_types(raw: &str) -> Result<String> {
    let mut validated = Vec::new();
    for token in raw.split_whitespace() {
        if !OVERLAY_NET_TYPES.contains(&token) {
            return Err(CharmError::unsupported_overlay_type(token));
        }
        validated.push(token);
    }
    Ok(validated.join(","))
}
