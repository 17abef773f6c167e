//! Error classification.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Broad error kind, one per failure class the facade can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Non-success HTTP status, missing body, or a failed request.
    Transport,
    /// Malformed bytes or a broken connection mid-stream.
    Decode,
    /// Capability query failed while creating a facade.
    Construction,
    /// Local backend probe failed; never fatal on its own.
    CapabilityProbe,
    InvalidArgument,
    Configuration,
    Serialization,
}
