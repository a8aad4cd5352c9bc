// Identifier codec
//
// The controller's REST API takes MAC addresses and datapath IDs in two
// notations: colon-separated octets ("00:00:00:00:00:00:00:0b") in
// response bodies, and compact hex ("0xb") in a handful of query
// parameters. These conversions are pure string/number munging with
// strict width validation in both directions.

use std::fmt;

use crate::error::Error;

/// The kind of identifier being encoded or decoded.
///
/// Determines the expected octet count (and therefore bit width):
/// 6 octets / 48 bits for a MAC address, 8 octets / 64 bits for a
/// datapath ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Mac,
    Dpid,
}

impl IdKind {
    /// Number of octets in the colon-separated textual form.
    pub fn octets(self) -> usize {
        match self {
            Self::Mac => 6,
            Self::Dpid => 8,
        }
    }

    /// Bit width of the numeric value.
    pub fn bits(self) -> u32 {
        match self {
            Self::Mac => 48,
            Self::Dpid => 64,
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mac => write!(f, "MAC"),
            Self::Dpid => write!(f, "datapath"),
        }
    }
}

fn malformed(kind: IdKind, input: &str, reason: impl Into<String>) -> Error {
    Error::MalformedIdentifier {
        kind,
        input: input.to_owned(),
        reason: reason.into(),
    }
}

/// Convert a colon-separated identifier to compact `0x`-prefixed hex.
///
/// Leading zero octets are dropped; the zero value renders as `"0x0"`.
///
/// ```
/// use flare_api::addr::{to_hex, IdKind};
///
/// assert_eq!(to_hex("00:00:00:00:00:01", IdKind::Mac).unwrap(), "0x1");
/// ```
pub fn to_hex(text: &str, kind: IdKind) -> Result<String, Error> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != kind.octets() {
        return Err(malformed(
            kind,
            text,
            format!("expected {} octets, got {}", kind.octets(), parts.len()),
        ));
    }

    let mut value: u64 = 0;
    for part in parts {
        if part.is_empty() || part.len() > 2 {
            return Err(malformed(kind, text, format!("bad octet {part:?}")));
        }
        let octet = u8::from_str_radix(part, 16)
            .map_err(|_| malformed(kind, text, format!("bad octet {part:?}")))?;
        value = (value << 8) | u64::from(octet);
    }

    Ok(format!("{value:#x}"))
}

/// Convert a `0x`-prefixed (or bare) hex string to the zero-padded,
/// colon-separated textual form.
///
/// Fails if the value exceeds the bit width for `kind`.
///
/// ```
/// use flare_api::addr::{to_text, IdKind};
///
/// assert_eq!(
///     to_text("0x2", IdKind::Dpid).unwrap(),
///     "00:00:00:00:00:00:00:02"
/// );
/// ```
pub fn to_text(hex: &str, kind: IdKind) -> Result<String, Error> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);

    let value = u64::from_str_radix(digits, 16)
        .map_err(|e| malformed(kind, hex, format!("not a hex value: {e}")))?;

    if kind.bits() < 64 && value >> kind.bits() != 0 {
        return Err(malformed(
            kind,
            hex,
            format!("value exceeds {} bits", kind.bits()),
        ));
    }

    let octets: Vec<String> = (0..kind.octets())
        .rev()
        .map(|i| format!("{:02x}", (value >> (i * 8)) & 0xff))
        .collect();

    Ok(octets.join(":"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_text_to_hex() {
        assert_eq!(to_hex("00:00:00:00:00:01", IdKind::Mac).unwrap(), "0x1");
    }

    #[test]
    fn dpid_text_to_hex() {
        assert_eq!(
            to_hex("00:00:00:00:00:00:00:02", IdKind::Dpid).unwrap(),
            "0x2"
        );
    }

    #[test]
    fn mac_hex_to_text() {
        assert_eq!(to_text("0x1", IdKind::Mac).unwrap(), "00:00:00:00:00:01");
    }

    #[test]
    fn dpid_hex_to_text() {
        assert_eq!(
            to_text("0x2", IdKind::Dpid).unwrap(),
            "00:00:00:00:00:00:00:02"
        );
    }

    #[test]
    fn zero_renders_as_0x0() {
        assert_eq!(to_hex("00:00:00:00:00:00", IdKind::Mac).unwrap(), "0x0");
        assert_eq!(to_text("0x0", IdKind::Mac).unwrap(), "00:00:00:00:00:00");
    }

    #[test]
    fn full_width_value() {
        assert_eq!(
            to_hex("ff:ff:ff:ff:ff:ff", IdKind::Mac).unwrap(),
            "0xffffffffffff"
        );
        assert_eq!(
            to_text("0xffffffffffffffff", IdKind::Dpid).unwrap(),
            "ff:ff:ff:ff:ff:ff:ff:ff"
        );
    }

    #[test]
    fn round_trip_normalizes() {
        // Upper-case and unpadded inputs normalize to lower-case padded text.
        let hex = to_hex("0:0:AB:cd:0:1", IdKind::Mac).unwrap();
        assert_eq!(to_text(&hex, IdKind::Mac).unwrap(), "00:00:ab:cd:00:01");

        for text in ["00:1b:21:3c:9d:f8", "de:ad:be:ef:00:01"] {
            let hex = to_hex(text, IdKind::Mac).unwrap();
            assert_eq!(to_text(&hex, IdKind::Mac).unwrap(), text);
        }
        for text in ["00:00:00:00:00:00:00:0b", "0f:ff:00:00:12:34:56:78"] {
            let hex = to_hex(text, IdKind::Dpid).unwrap();
            assert_eq!(to_text(&hex, IdKind::Dpid).unwrap(), text);
        }
    }

    #[test]
    fn bare_hex_accepted() {
        assert_eq!(to_text("b", IdKind::Dpid).unwrap(), "00:00:00:00:00:00:00:0b");
        assert_eq!(to_text("0XB", IdKind::Dpid).unwrap(), "00:00:00:00:00:00:00:0b");
    }

    #[test]
    fn wrong_octet_count_rejected() {
        // A MAC parsed as a DPID (and vice versa) must fail.
        assert!(matches!(
            to_hex("00:00:00:00:00:01", IdKind::Dpid),
            Err(Error::MalformedIdentifier { kind: IdKind::Dpid, .. })
        ));
        assert!(matches!(
            to_hex("00:00:00:00:00:00:00:02", IdKind::Mac),
            Err(Error::MalformedIdentifier { kind: IdKind::Mac, .. })
        ));
    }

    #[test]
    fn bad_octets_rejected() {
        assert!(to_hex("00:00:00:00:00:zz", IdKind::Mac).is_err());
        assert!(to_hex("00:00:00:00:00:123", IdKind::Mac).is_err());
        assert!(to_hex("00:00:00:00:00:", IdKind::Mac).is_err());
    }

    #[test]
    fn oversized_value_rejected() {
        // 49 bits does not fit a MAC.
        assert!(matches!(
            to_text("0x1000000000000", IdKind::Mac),
            Err(Error::MalformedIdentifier { kind: IdKind::Mac, .. })
        ));
        // 65 bits does not fit a DPID either (parse overflow).
        assert!(to_text("0x10000000000000000", IdKind::Dpid).is_err());
    }

    #[test]
    fn garbage_hex_rejected() {
        assert!(to_text("0xnope", IdKind::Mac).is_err());
        assert!(to_text("", IdKind::Mac).is_err());
        assert!(to_text("0x", IdKind::Mac).is_err());
    }
}
