//! Standardized schemas for image capabilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogoVertex {
    pub x: f64,
    pub y: f64,
}

/// Polygon around a detected logo, as four corner vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogoBoundingPoly {
    pub vertices: Vec<LogoVertex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoItem {
    /// Brand name, when the vendor reports one.
    pub description: Option<String>,
    pub score: Option<f64>,
    pub bounding_poly: LogoBoundingPoly,
}

/// Shared output shape of `image/logo_detection`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogoDetectionResult {
    pub items: Vec<LogoItem>,
}
