pub mod apigateway;

use serde::Serialize;

use self::apigateway::ApiGateway;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aws {
    pub api_gateway: ApiGateway,
}
