//! Platform → routing region mapping.
//!
//! Account and match endpoints are served per routing cluster; everything
//! else is served per platform.

use crate::Error;

const ROUTING: &[(&str, &str)] = &[
    ("na1", "americas"),
    ("br1", "americas"),
    ("la1", "americas"),
    ("la2", "americas"),
    ("euw1", "europe"),
    ("eun1", "europe"),
    ("tr1", "europe"),
    ("ru", "europe"),
    ("kr", "asia"),
    ("jp1", "asia"),
    ("oc1", "sea"),
    ("ph2", "sea"),
    ("sg2", "sea"),
    ("th2", "sea"),
    ("tw2", "sea"),
    ("vn2", "sea"),
];

/// Routing cluster for a platform region (case-insensitive).
pub fn routing_for(platform: &str) -> Result<&'static str, Error> {
    let wanted = platform.trim().to_ascii_lowercase();
    ROUTING
        .iter()
        .find(|(p, _)| *p == wanted)
        .map(|(_, routing)| *routing)
        .ok_or_else(|| Error::UnknownRegion(platform.to_string()))
}

/// Normalized platform id, validated against the known set.
pub fn normalize_platform(platform: &str) -> Result<String, Error> {
    routing_for(platform)?;
    Ok(platform.trim().to_ascii_lowercase())
}

/// All known platform regions.
pub fn platforms() -> impl Iterator<Item = &'static str> {
    ROUTING.iter().map(|(p, _)| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_clusters() {
        assert_eq!(routing_for("na1").unwrap(), "americas");
        assert_eq!(routing_for("EUW1").unwrap(), "europe");
        assert_eq!(routing_for("kr").unwrap(), "asia");
        assert_eq!(routing_for("vn2").unwrap(), "sea");
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let err = routing_for("mars1").unwrap_err();
        assert!(matches!(err, Error::UnknownRegion(ref r) if r == "mars1"));
    }

    #[test]
    fn test_every_platform_routes() {
        assert_eq!(platforms().count(), 16);
        for p in platforms() {
            assert!(routing_for(p).is_ok());
        }
    }
}
