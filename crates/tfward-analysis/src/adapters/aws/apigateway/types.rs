//! Normalized API Gateway domain objects.

use serde::Serialize;
use tfward_core::Metadata;

use crate::graph::{BoolValue, IntValue, StringValue, Typed};

/// Protocol type reported for REST (v1) APIs.
pub const PROTOCOL_TYPE_REST: &str = "REST";
/// Protocol types an HTTP/WebSocket (v2) API may declare.
pub const PROTOCOL_TYPE_HTTP: &str = "HTTP";
pub const PROTOCOL_TYPE_WEBSOCKET: &str = "WEBSOCKET";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiGateway {
    pub apis: Vec<Api>,
}

/// One API with its stages and, for REST APIs, its methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Api {
    pub metadata: Metadata,
    pub name: StringValue,
    /// 1 for REST APIs, 2 for HTTP/WebSocket APIs.
    pub version: IntValue,
    pub protocol_type: StringValue,
    pub rest_methods: Vec<RestMethod>,
    pub stages: Vec<Stage>,
}

impl Api {
    /// Container for stages whose parent API could not be resolved.
    pub fn unmanaged(version: i64) -> Self {
        let metadata = Metadata::unmanaged();
        Self {
            name: Typed::defaulted(String::new(), metadata.clone()),
            version: Typed::defaulted(version, metadata.clone()),
            protocol_type: Typed::defaulted(String::new(), metadata.clone()),
            rest_methods: Vec::new(),
            stages: Vec::new(),
            metadata,
        }
    }

    pub fn is_managed(&self) -> bool {
        self.metadata.is_managed()
    }

    pub fn is_rest(&self) -> bool {
        *self.version.value() == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub metadata: Metadata,
    pub name: StringValue,
    pub version: IntValue,
    pub access_logging: AccessLogging,
    pub rest_method_settings: RestMethodSettings,
    pub xray_tracing_enabled: BoolValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessLogging {
    pub metadata: Metadata,
    pub cloudwatch_log_group_arn: StringValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestMethodSettings {
    pub metadata: Metadata,
    pub cache_data_encrypted: BoolValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestMethod {
    pub metadata: Metadata,
    pub http_method: StringValue,
    pub authorization_type: StringValue,
    pub api_key_required: BoolValue,
}
