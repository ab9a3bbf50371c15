pub mod apigateway;

use tfward_core::errors::RegistryError;

use crate::rules::registry::RuleRegistry;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistryError> {
    registry.register(apigateway::enable_access_logging())?;
    registry.register(apigateway::enable_cache_encryption())?;
    registry.register(apigateway::enable_tracing())?;
    registry.register(apigateway::no_public_access())?;
    Ok(())
}
