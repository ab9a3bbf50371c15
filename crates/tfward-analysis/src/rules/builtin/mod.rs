//! Built-in rules, registered in a fixed order so scans are reproducible.

pub mod aws;
pub mod google;
pub mod openstack;

use tfward_core::errors::RegistryError;

use super::registry::RuleRegistry;

pub fn register_all(registry: &mut RuleRegistry) -> Result<(), RegistryError> {
    aws::register(registry)?;
    google::register(registry)?;
    openstack::register(registry)?;
    Ok(())
}
