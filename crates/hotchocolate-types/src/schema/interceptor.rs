//! Type interceptors hook into the phases of type initialization.
//!
//! Hooks run in this order:
//! 1. `on_type_discovered` for every registered type, including types
//!    registered by other hooks
//! 2. `on_after_complete_type_names`
//! 3. `on_after_merge_type_extensions`; types registered here are discovered
//!    and named before dependencies are resolved
//! 4. `on_before_complete_type` / `on_after_complete_type` per type
//! 5. `on_types_completed`

use crate::config::SchemaOptions;
use crate::error::SchemaError;
use crate::types::reference::TypeId;

use super::registry::TypeRegistry;

/// Mutable view of a schema build handed to interceptors.
pub struct InterceptorContext<'a> {
    pub registry: &'a mut TypeRegistry,
    pub errors: &'a mut Vec<SchemaError>,
    pub options: &'a SchemaOptions,
}

impl InterceptorContext<'_> {
    /// Records a configuration error; the build continues.
    pub fn report(&mut self, error: SchemaError) {
        self.errors.push(error);
    }
}

/// A participant in type initialization. All hooks default to no-ops.
pub trait TypeInterceptor: Send {
    fn on_type_discovered(&mut self, _context: &mut InterceptorContext<'_>, _id: TypeId) {}

    fn on_after_complete_type_names(&mut self, _context: &mut InterceptorContext<'_>) {}

    fn on_after_merge_type_extensions(&mut self, _context: &mut InterceptorContext<'_>) {}

    fn on_before_complete_type(&mut self, _context: &mut InterceptorContext<'_>, _id: TypeId) {}

    fn on_after_complete_type(&mut self, _context: &mut InterceptorContext<'_>, _id: TypeId) {}

    fn on_types_completed(&mut self, _context: &mut InterceptorContext<'_>) {}
}
