//! # Placement Merger
//!
//! Pixel-space rectangles adjusted on the placement canvas are converted to
//! the scene's coordinate convention and folded into the style configuration
//! under its `positions` key.

use crate::errors::WorkflowError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Key of the rectangle seeded when no boundary has been computed
pub const DEFAULT_RECTANGLE_ID: &str = "default";

/// Pixel-space rectangle, origin at the canvas' top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Object identifier → rectangle. Empty is valid (nothing placed yet).
pub type PlacementBoundary = BTreeMap<String, Rect>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// Converts canvas rectangles into the value stored under `positions`
pub trait CoordinateTransform {
    fn to_target_coordinates(&self, boundary: &PlacementBoundary, canvas: Canvas) -> Value;
}

/// Maps the canvas onto a scene frame centred on the origin with y pointing up.
///
/// Each rectangle becomes `{x, y, width, height}` in frame units, where
/// `(x, y)` is its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenteredFrameTransform {
    pub frame_width: f64,
    pub frame_height: f64,
}

impl CoordinateTransform for CenteredFrameTransform {
    fn to_target_coordinates(&self, boundary: &PlacementBoundary, canvas: Canvas) -> Value {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            tracing::warn!("Degenerate canvas {}x{}, dropping positions", canvas.width, canvas.height);
            return Value::Object(Map::new());
        }

        let scale_x = |v: f64| v * self.frame_width / canvas.width;
        let scale_y = |v: f64| v * self.frame_height / canvas.height;

        let positions = boundary
            .iter()
            .map(|(id, rect)| {
                let position = json!({
                    "x": scale_x(rect.x) - self.frame_width / 2.0,
                    "y": self.frame_height / 2.0 - scale_y(rect.y + rect.height),
                    "width": scale_x(rect.width),
                    "height": scale_y(rect.height),
                });
                (id.clone(), position)
            })
            .collect::<Map<_, _>>();

        Value::Object(positions)
    }
}

/// Fold `boundary` into `style_text` under `positions`.
///
/// Empty style text is treated as `{}`. Anything else must parse as a JSON
/// object; all other fields are preserved in order. Output is compact JSON.
pub fn merge_placement(
    boundary: &PlacementBoundary,
    style_text: &str,
    canvas: Canvas,
    transform: &dyn CoordinateTransform,
) -> Result<String, WorkflowError> {
    let mut parsed: Map<String, Value> = if style_text.is_empty() {
        Map::new()
    } else {
        serde_json::from_str(style_text).map_err(WorkflowError::MalformedConfig)?
    };

    parsed.insert(
        "positions".to_string(),
        transform.to_target_coordinates(boundary, canvas),
    );

    Ok(Value::Object(parsed).to_string())
}

/// Rectangles the placement surface starts from: the stored boundary, or a
/// single canvas-sized rectangle when it is empty
pub fn seed_rectangles(boundary: &PlacementBoundary, canvas: Canvas) -> PlacementBoundary {
    if !boundary.is_empty() {
        return boundary.clone();
    }

    BTreeMap::from([(
        DEFAULT_RECTANGLE_ID.to_string(),
        Rect::new(0.0, 0.0, canvas.width, canvas.height),
    )])
}
