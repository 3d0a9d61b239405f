//! Screenshot and annotation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Badge;
use crate::error::AnnotationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotType {
    Fullscreen,
    Region,
    Window,
}

impl ScreenshotType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fullscreen => "全屏",
            Self::Region => "区域",
            Self::Window => "窗口",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotStatus {
    Draft,
    Saved,
    Sent,
}

impl ScreenshotStatus {
    pub fn badge(&self) -> Badge {
        match self {
            Self::Draft => Badge::new("草稿", "badge-slate"),
            Self::Saved => Badge::new("已保存", "badge-blue"),
            Self::Sent => Badge::new("已发送", "badge-emerald"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Shape payload, one variant per annotation kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationShape {
    #[serde(rename_all = "camelCase")]
    Arrow {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        content: String,
        font_size: f64,
    },
    #[serde(rename_all = "camelCase")]
    Brush { points: Vec<Point>, line_width: f64 },
}

impl AnnotationShape {
    pub fn arrow(start: Point, end: Point) -> Self {
        Self::Arrow {
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    pub fn rectangle(origin: Point, width: f64, height: f64) -> Self {
        Self::Rectangle {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }

    pub fn text(at: Point, content: impl Into<String>, font_size: f64) -> Self {
        Self::Text {
            x: at.x,
            y: at.y,
            content: content.into(),
            font_size,
        }
    }

    pub fn brush(points: Vec<Point>, line_width: f64) -> Self {
        Self::Brush { points, line_width }
    }

    pub fn tool(&self) -> Tool {
        match self {
            Self::Arrow { .. } => Tool::Arrow,
            Self::Rectangle { .. } => Tool::Rectangle,
            Self::Text { .. } => Tool::Text,
            Self::Brush { .. } => Tool::Brush,
        }
    }

    /// Reject degenerate payloads
    pub fn validate(&self) -> std::result::Result<(), AnnotationError> {
        match self {
            Self::Arrow {
                start_x,
                start_y,
                end_x,
                end_y,
            } => {
                if start_x == end_x && start_y == end_y {
                    return Err(AnnotationError::InvalidShape(
                        "arrow start and end coincide".to_string(),
                    ));
                }
            }
            Self::Rectangle { width, height, .. } => {
                if *width <= 0.0 || *height <= 0.0 {
                    return Err(AnnotationError::InvalidShape(format!(
                        "rectangle size {}x{} must be positive",
                        width, height
                    )));
                }
            }
            Self::Text {
                content, font_size, ..
            } => {
                if content.trim().is_empty() {
                    return Err(AnnotationError::InvalidShape("text is empty".to_string()));
                }
                if *font_size <= 0.0 {
                    return Err(AnnotationError::InvalidShape(format!(
                        "font size {} must be positive",
                        font_size
                    )));
                }
            }
            Self::Brush { points, line_width } => {
                if points.len() < 2 {
                    return Err(AnnotationError::InvalidShape(
                        "brush stroke needs at least two points".to_string(),
                    ));
                }
                if *line_width <= 0.0 {
                    return Err(AnnotationError::InvalidShape(format!(
                        "line width {} must be positive",
                        line_width
                    )));
                }
            }
        }
        Ok(())
    }
}

/// An annotation drawn over a screenshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub id: String,
    pub color: String,
    #[serde(flatten)]
    pub shape: AnnotationShape,
}

/// Active drawing tool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Arrow,
    Rectangle,
    Text,
    Brush,
}

/// A captured screenshot with its annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    pub id: String,
    #[serde(rename = "type")]
    pub screenshot_type: ScreenshotType,
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    pub status: ScreenshotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_annotation_flat_json_shape() {
        let json = r##"{
            "id": "a1",
            "type": "arrow",
            "color": "#ef4444",
            "startX": 10, "startY": 20, "endX": 110, "endY": 80
        }"##;

        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(
            annotation.shape,
            AnnotationShape::arrow(Point::new(10.0, 20.0), Point::new(110.0, 80.0))
        );
        assert_eq!(annotation.shape.tool(), Tool::Arrow);

        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["type"], "arrow");
        assert_eq!(value["endX"], 110.0);
    }

    #[test]
    fn test_brush_json_shape() {
        let json = r##"{
            "id": "a2", "type": "brush", "color": "#000",
            "points": [{"x": 1, "y": 1}, {"x": 2, "y": 3}],
            "lineWidth": 3
        }"##;

        let annotation: Annotation = serde_json::from_str(json).unwrap();
        match annotation.shape {
            AnnotationShape::Brush { points, line_width } => {
                assert_eq!(points.len(), 2);
                assert_eq!(line_width, 3.0);
            }
            other => panic!("expected brush, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_degenerate_shapes() {
        assert!(AnnotationShape::brush(vec![Point::new(0.0, 0.0)], 2.0)
            .validate()
            .is_err());
        assert!(AnnotationShape::rectangle(Point::new(0.0, 0.0), 0.0, 10.0)
            .validate()
            .is_err());
        assert!(AnnotationShape::text(Point::new(0.0, 0.0), "  ", 14.0)
            .validate()
            .is_err());
        assert!(AnnotationShape::arrow(Point::new(1.0, 1.0), Point::new(1.0, 1.0))
            .validate()
            .is_err());
        assert!(AnnotationShape::text(Point::new(5.0, 5.0), "注意", 14.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_screenshot_status_badge() {
        assert_eq!(ScreenshotStatus::Sent.badge().label, "已发送");
        assert_eq!(ScreenshotType::Region.label(), "区域");
    }
}
