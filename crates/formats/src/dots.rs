use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Radius of the sphere the offline generator projects land dots onto.
///
/// The generator samples a golden-angle sphere, keeps points that fall on
/// land, and writes them out already projected — the runtime never re-runs
/// that batch job, it only consumes the file.
pub const DOT_DATASET_RADIUS: f64 = 150.0;

/// One pre-projected land dot.
///
/// Loaded once as an immutable array; per-frame recoloring happens in a
/// parallel color buffer, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandDot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub country_name: String,
    pub iso_a3: String,
}

impl LandDot {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug)]
pub enum DotDataError {
    Parse(serde_json::Error),
    Empty,
    NonFinitePosition { index: usize },
    MissingIso { index: usize },
}

impl std::fmt::Display for DotDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotDataError::Parse(err) => write!(f, "land-dot parse error: {err}"),
            DotDataError::Empty => write!(f, "land-dot dataset is empty"),
            DotDataError::NonFinitePosition { index } => {
                write!(f, "land dot {index} has a non-finite position")
            }
            DotDataError::MissingIso { index } => {
                write!(f, "land dot {index} has an empty ISO A3 code")
            }
        }
    }
}

impl std::error::Error for DotDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DotDataError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Parse and validate a land-dot dataset.
///
/// The dataset is decorative, so validation is strict-but-cheap: any bad
/// record rejects the file as a whole and the caller keeps the globe hidden.
pub fn parse_land_dots(json: &str) -> Result<Vec<LandDot>, DotDataError> {
    let dots: Vec<LandDot> = serde_json::from_str(json).map_err(DotDataError::Parse)?;
    if dots.is_empty() {
        return Err(DotDataError::Empty);
    }
    for (index, dot) in dots.iter().enumerate() {
        if !(dot.x.is_finite() && dot.y.is_finite() && dot.z.is_finite()) {
            return Err(DotDataError::NonFinitePosition { index });
        }
        if dot.iso_a3.is_empty() {
            return Err(DotDataError::MissingIso { index });
        }
    }
    Ok(dots)
}

#[cfg(test)]
mod tests {
    use super::{DotDataError, parse_land_dots};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"[
        {"x": 10.0, "y": 0.0, "z": 0.0, "countryName": "United States", "isoA3": "USA"},
        {"x": 0.0, "y": 10.0, "z": 0.0, "countryName": "Colombia", "isoA3": "COL"}
    ]"#;

    #[test]
    fn parses_camel_case_fields() {
        let dots = parse_land_dots(SAMPLE).expect("parse");
        assert_eq!(dots.len(), 2);
        assert_eq!(dots[0].iso_a3, "USA");
        assert_eq!(dots[0].country_name, "United States");
        assert_eq!(dots[1].position().y, 10.0);
    }

    #[test]
    fn rejects_empty_dataset() {
        assert!(matches!(parse_land_dots("[]"), Err(DotDataError::Empty)));
    }

    #[test]
    fn rejects_non_finite_positions() {
        let bad = r#"[{"x": null, "y": 0.0, "z": 0.0, "countryName": "X", "isoA3": "XXX"}]"#;
        assert!(matches!(parse_land_dots(bad), Err(DotDataError::Parse(_))));

        let inf = r#"[{"x": 1e999, "y": 0.0, "z": 0.0, "countryName": "X", "isoA3": "XXX"}]"#;
        assert!(parse_land_dots(inf).is_err());
    }

    #[test]
    fn rejects_blank_iso() {
        let bad = r#"[{"x": 1.0, "y": 0.0, "z": 0.0, "countryName": "X", "isoA3": ""}]"#;
        assert!(matches!(
            parse_land_dots(bad),
            Err(DotDataError::MissingIso { index: 0 })
        ));
    }
}
