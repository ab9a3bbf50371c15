pub mod fw;

use tfward_core::errors::RegistryError;

use crate::rules::registry::RuleRegistry;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistryError> {
    registry.register(fw::no_public_access())
}
