//! AWS API Gateway: REST (v1) and HTTP/WebSocket (v2) APIs.

pub mod apiv1;
pub mod apiv2;
pub mod types;

pub use apiv1::RestApiAdapter;
pub use apiv2::HttpApiAdapter;
pub use types::{AccessLogging, Api, ApiGateway, RestMethod, RestMethodSettings, Stage};
