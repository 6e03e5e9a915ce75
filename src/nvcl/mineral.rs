use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ParseFault;

/// One entry of the downsampled mineral class data.
#[derive(Clone, Debug, Deserialize)]
struct Measurement {
    #[serde(rename = "roundedDepth")]
    rounded_depth: f64,
    #[serde(rename = "classText")]
    class_text: String,
    #[serde(rename = "classCount")]
    class_count: f64,
    colour: u32,
}

/// The dominant mineral class at one depth.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepthClass {
    pub depth: f64,
    pub class_name: String,
    pub class_text: String,
    /// RGBA, each channel in `[0, 1]`.
    pub colour: [f64; 4],
}

/// Convert a BGR colour integer to RGBA floats.
pub fn bgr_to_rgba(bgr: u32) -> [f64; 4] {
    [
        f64::from(bgr & 0xff) / 255.0,
        f64::from((bgr & 0xff00) >> 8) / 255.0,
        f64::from(bgr >> 16) / 255.0,
        1.0,
    ]
}

/// Reduce downsampled JSON data to the most frequent valid class per depth,
/// in ascending depth order.
pub fn dominant_classes(body: &[u8], class_name: &str) -> Result<Vec<DepthClass>, ParseFault> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let mut measurements: Vec<Measurement> = serde_json::from_slice(body)?;
    measurements.sort_by(|a, b| a.rounded_depth.total_cmp(&b.rounded_depth));

    let mut classes = Vec::new();
    for group in depth_groups(&measurements) {
        let depth = group[0].rounded_depth;

        // the first of several equal counts wins
        let dominant = group
            .iter()
            .filter(|measurement| !measurement.class_text.eq_ignore_ascii_case("INVALID"))
            .fold(None, |best: Option<&Measurement>, measurement| match best {
                Some(best) if best.class_count >= measurement.class_count => Some(best),
                _ => Some(measurement),
            });

        match dominant {
            Some(measurement) => classes.push(DepthClass {
                depth,
                class_name: class_name.to_string(),
                class_text: measurement.class_text.clone(),
                colour: bgr_to_rgba(measurement.colour),
            }),
            None => warn!("No valid values at depth {}", depth),
        }
    }

    Ok(classes)
}

/// Runs of equal depth in a depth-sorted slice.
fn depth_groups(measurements: &[Measurement]) -> Vec<&[Measurement]> {
    let mut groups = Vec::new();
    let mut start = 0;

    for index in 1..=measurements.len() {
        if index == measurements.len()
            || measurements[index].rounded_depth != measurements[start].rounded_depth
        {
            groups.push(&measurements[start..index]);
            start = index;
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn colour_conversion() {
        assert_eq!(bgr_to_rgba(0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(bgr_to_rgba(0x0000ff), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(bgr_to_rgba(0x00ff00), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(bgr_to_rgba(0xff0000), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn dominant_class_per_depth() {
        let body = json!([
            {"roundedDepth": 15.0, "classText": "KAOLINITE", "classCount": 3, "colour": 255},
            {"roundedDepth": 5.0, "classText": "WHITE-MICA", "classCount": 2, "colour": 65280},
            {"roundedDepth": 5.0, "classText": "Kaolinite", "classCount": 9, "colour": 16711680},
            {"roundedDepth": 5.0, "classText": "INVALID", "classCount": 20, "colour": 0},
            {"roundedDepth": 10.0, "classText": "invalid", "classCount": 4, "colour": 0},
            {"roundedDepth": 15.0, "classText": "CHLORITE", "classCount": 3, "colour": 65280}
        ])
        .to_string();

        let classes = dominant_classes(body.as_bytes(), "Min1 uTSAS").unwrap();

        assert_eq!(
            classes,
            vec![
                DepthClass {
                    depth: 5.0,
                    class_name: "Min1 uTSAS".into(),
                    class_text: "Kaolinite".into(),
                    colour: [0.0, 0.0, 1.0, 1.0],
                },
                DepthClass {
                    depth: 15.0,
                    class_name: "Min1 uTSAS".into(),
                    class_text: "KAOLINITE".into(),
                    colour: [1.0, 0.0, 0.0, 1.0],
                },
            ]
        );
    }

    #[test]
    fn empty_and_bad_bodies() {
        assert!(dominant_classes(b"", "Min1").unwrap().is_empty());
        assert!(dominant_classes(b"[]", "Min1").unwrap().is_empty());
        assert!(matches!(
            dominant_classes(b"<html>Unknown log</html>", "Min1"),
            Err(ParseFault::Json(_))
        ));
    }
}
