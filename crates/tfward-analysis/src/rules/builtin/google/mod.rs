pub mod gke;

use tfward_core::errors::RegistryError;

use crate::rules::registry::RuleRegistry;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistryError> {
    registry.register(gke::enable_stackdriver_monitoring())
}
