//! Remote collaborators and the payloads exchanged with them.
//!
//! The compile and boundary services are reached over the network by the
//! embedding page; only their request/response contracts live here.

use crate::errors::ServiceError;
use crate::placement::PlacementBoundary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Low => f.write_str("low"),
            Quality::Medium => f.write_str("medium"),
            Quality::High => f.write_str("high"),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            other => Err(format!("Invalid quality: {}. Use: low, medium, or high", other)),
        }
    }
}

/// User-toggled compile options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    pub generate_python: bool,
    /// Mirrored into the style configuration under `hideCode`
    pub hide_code: bool,
    pub quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub program: String,
    pub style: String,
    pub name: String,
    pub generate_python: bool,
    pub quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CompileResponse {
    pub fn success(data: Option<Value>) -> Self {
        Self {
            success: true,
            message: String::new(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRequest {
    pub program: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryResponse {
    #[serde(default)]
    pub data: PlacementBoundary,
}

/// Compiles a program/style pair into an animation
#[async_trait(?Send)]
pub trait CompileService {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, ServiceError>;
}

/// Suggests initial placement rectangles for a program/style pair
#[async_trait(?Send)]
pub trait BoundaryService {
    async fn compute_boundaries(
        &self,
        request: &BoundaryRequest,
    ) -> Result<BoundaryResponse, ServiceError>;
}
