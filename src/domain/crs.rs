//! Coordinate reference system handling.
//!
//! Only two questions are ever asked of a CRS here: "is it the same system as
//! that one?" and "is it projected?". EPSG codes are looked up in the
//! `crs-definitions` registry; inline WKT is classified by its root keyword.

use std::fmt;

use serde::{Deserialize, Serialize};

/// proj4 projections that describe angular or earth-centred coordinates.
const NON_PLANAR_PROJ4: [&str; 3] = ["+proj=longlat", "+proj=latlong", "+proj=geocent"];

/// Coordinate reference system representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// EPSG code if known
    epsg: Option<u32>,
    /// WKT representation
    wkt: Option<String>,
    /// Name as found in the source file when it is neither EPSG nor WKT
    name: Option<String>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
            name: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            epsg: None,
            wkt: Some(wkt.into()),
            name: None,
        }
    }

    /// Parse a CRS name as it appears in a GeoJSON `crs` member.
    ///
    /// Accepted forms: `EPSG:2449`, `urn:ogc:def:crs:EPSG::2449`,
    /// `urn:ogc:def:crs:EPSG:6.6:2449`, `urn:ogc:def:crs:OGC:1.3:CRS84`,
    /// and WKT. Anything else is kept verbatim as an opaque name.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        let upper = trimmed.to_ascii_uppercase();

        if upper.ends_with("CRS84") {
            // CRS84 only differs from EPSG:4326 in axis order.
            return Self::from_epsg(4326);
        }

        if let Some(rest) = upper.strip_prefix("EPSG:") {
            if let Ok(code) = rest.trim().parse::<u32>() {
                return Self::from_epsg(code);
            }
        }

        if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            let code = upper.rsplit(':').next().and_then(|s| s.parse::<u32>().ok());
            if let Some(code) = code {
                return Self::from_epsg(code);
            }
        }

        if wkt_root(&upper).is_some() {
            return Self::from_wkt(trimmed);
        }

        Self {
            epsg: None,
            wkt: None,
            name: Some(trimmed.to_string()),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// True for planar, distance-preserving systems.
    ///
    /// Opaque names and EPSG codes missing from the registry are never
    /// treated as projected.
    pub fn is_projected(&self) -> bool {
        if let Some(code) = self.epsg {
            return is_projected_epsg(code);
        }
        if let Some(wkt) = &self.wkt {
            return is_projected_wkt(wkt);
        }
        false
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }

        // Whitespace differences in WKT are not meaningful.
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return normalize_wkt(a) == normalize_wkt(b);
        }

        if let (Some(a), Some(b)) = (&self.name, &other.name) {
            return a == b;
        }

        false
    }

    /// Name to write back into a GeoJSON `crs` member.
    ///
    /// WKT-only systems have no named form and yield `None`.
    pub fn geojson_name(&self) -> Option<String> {
        if let Some(code) = self.epsg {
            return Some(format!("urn:ogc:def:crs:EPSG::{code}"));
        }
        self.name.clone()
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{code}");
        }
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(wkt) = &self.wkt {
            let head: String = wkt.chars().take(50).collect();
            return format!("WKT:{head}");
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

fn is_projected_epsg(code: u32) -> bool {
    let Some(def) = u16::try_from(code).ok().and_then(crs_definitions::from_code) else {
        return false;
    };
    if !def.wkt.trim().is_empty() {
        return is_projected_wkt(def.wkt);
    }
    let proj4 = def.proj4.trim();
    !proj4.is_empty() && !NON_PLANAR_PROJ4.iter().any(|p| proj4.contains(p))
}

fn is_projected_wkt(wkt: &str) -> bool {
    let upper = wkt.trim().to_ascii_uppercase();
    matches!(wkt_root(&upper), Some("PROJCS" | "PROJCRS" | "PROJECTEDCRS"))
}

fn wkt_root(upper: &str) -> Option<&'static str> {
    const ROOTS: [&str; 11] = [
        "PROJCS",
        "PROJCRS",
        "PROJECTEDCRS",
        "GEOGCS",
        "GEOGCRS",
        "GEOGRAPHICCRS",
        "GEODCRS",
        "GEOCCS",
        "VERT_CS",
        "COMPD_CS",
        "COMPOUNDCRS",
    ];
    let head = upper.split('[').next()?.trim();
    ROOTS.into_iter().find(|root| *root == head && upper.len() > head.len())
}

fn normalize_wkt(wkt: &str) -> String {
    wkt.chars().filter(|c| !c.is_whitespace()).collect()
}
