pub mod courses;

use catalog_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    registry.register(courses::create_module(&settings.courses));
}
