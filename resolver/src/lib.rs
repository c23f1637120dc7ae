//! Read side of the content engine.
//!
//! Merged dimension contents are turned into `content`/`view` trees. Field
//! values are resolved per field type by the [`PropertyResolverPool`];
//! references to other resources stay lazy as [`ResolvableResource`]s until
//! the [`ContentResolver`] loads them in bulk through the
//! [`ResourceLoaderRegistry`].

pub mod content_resolver;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod property;
pub mod resolvers;
pub mod view;

pub use content_resolver::{ContentResolver, ResolvedContent, ResolvedPart};
pub use error::{ResolverError, Result};
pub use loader::{LoadedResources, ResourceLoader, ResourceLoaderRegistry, ResourceRequests};
pub use metadata::MetadataResolver;
pub use property::{
    DefaultPropertyResolver, MediaSelectionPropertyResolver, PropertyResolver,
    PropertyResolverPool, ReferenceListPropertyResolver, SelectPropertyResolver,
    SingleMediaSelectionPropertyResolver, SingleReferencePropertyResolver,
    SingleSelectPropertyResolver,
};
pub use resolvers::{
    view_locale, DimensionContentResolver, ExcerptResolver, SeoResolver, TemplateResolver,
};
pub use view::{Content, ContentView, ResolvableResource, ResourceId};
