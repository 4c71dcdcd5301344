// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serde mirror of the scanner's wire format.

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// One node of the raw input tree, exactly as the scanner emits it.
///
/// The root of the input is an ordered array of these; construction inserts
/// an implicit synthetic root above them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    /// Size in KB. Required, expected to be non-negative.
    pub value: f64,
    /// Display label. Required, expected to be non-empty.
    pub name: String,
    /// Stable identifier, expected to be unique across the whole tree.
    pub path: String,
    /// Ordered child nodes; absent or empty means leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
    /// Opaque decorative URI. Never affects layout or size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Decode a top-level node array from a JSON string.
pub fn from_json_str(json: &str) -> Result<Vec<RawNode>, TreeError> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a top-level node array from a reader.
pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Vec<RawNode>, TreeError> {
    Ok(serde_json::from_reader(reader)?)
}
