use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// A two-line element set as distributed by the satellite database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tle {
    pub norad_cat_id: u32,
    pub tle0: String,
    pub tle1: String,
    pub tle2: String,
}

impl Tle {
    /// Build a TLE from its three text lines, deriving the catalog id from
    /// line 1. Returns `None` when the id field is not parseable.
    pub fn from_lines(tle0: &str, tle1: &str, tle2: &str) -> Option<Self> {
        let norad_cat_id = norad_id_from_line1(tle1)?;
        Some(Tle {
            norad_cat_id,
            tle0: tle0.to_string(),
            tle1: tle1.to_string(),
            tle2: tle2.to_string(),
        })
    }

    /// The satellite name, with the optional `0 ` line prefix stripped.
    pub fn name(&self) -> &str {
        self.tle0.strip_prefix("0 ").unwrap_or(&self.tle0)
    }
}

/// The catalog id field of line 1 ("1 25544U ..."). Older catalog numbers
/// are zero padded; the classification letter is ignored.
fn norad_id_from_line1(tle1: &str) -> Option<u32> {
    let field = tle1.split_whitespace().nth(1)?;
    let digits: String = field.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Read the cached TLE file (JSON, as fetched from the database).
pub fn read_tles(path: &Path) -> Result<Vec<Tle>, CatalogError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 25544U 98067A   20029.54791435  .00016717  00000-0  10270-3 0  9006";
    const LINE2: &str = "2 25544  51.6426 308.0305 0005181  69.9271 290.2451 15.49135461210805";

    #[test]
    fn derives_norad_id_from_line1() {
        let tle = Tle::from_lines("ISS (ZARYA)", LINE1, LINE2).unwrap();
        assert_eq!(tle.norad_cat_id, 25544);
    }

    #[test]
    fn strips_optional_name_prefix() {
        let named = Tle::from_lines("0 ISS (ZARYA)", LINE1, LINE2).unwrap();
        assert_eq!(named.name(), "ISS (ZARYA)");

        let bare = Tle::from_lines("ISS (ZARYA)", LINE1, LINE2).unwrap();
        assert_eq!(bare.name(), "ISS (ZARYA)");
    }

    #[test]
    fn handles_zero_padded_catalog_numbers() {
        let line1 = "1 00965U 64083D   20028.83230851  .00000064  00000-0  64238-4 0  9994";
        let line2 = "2 00965  90.0213  29.1883 0067310 359.5130  98.8083 13.56541783725585";
        let tle = Tle::from_lines("TRANSIT 5B-5", line1, line2).unwrap();
        assert_eq!(tle.norad_cat_id, 965);
    }

    #[test]
    fn rejects_unparseable_id() {
        assert!(Tle::from_lines("JUNK", "not a tle", LINE2).is_none());
    }
}
