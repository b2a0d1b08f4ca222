pub mod auth;
pub mod books;
pub mod sellers;

use bookstall_kernel::ModuleRegistry;

/// Register all modules. Sellers come first: books reference them.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(sellers::create_module());
    registry.register(books::create_module());
    registry.register(auth::create_module());
}
