//! Entity identity.
//!
//! Renderers are bound to concrete Rust types. Rather than inspecting values
//! reflectively, every renderable domain value implements [`Entity`], which
//! reports an explicit [`EntityType`] tag and exposes the value as
//! [`Any`] so a renderer can downcast it.
//!
//! Smart pointers are transparent: an `Arc<T>` or `Box<T>` reports the tag
//! of the `T` it wraps and hands out the inner value, so a value and a
//! pointer to it resolve to the same renderer.
//!
//! ```rust
//! use std::sync::Arc;
//! use entity_list_spi::{Entity, EntityType};
//!
//! struct Light { name: String }
//! impl Entity for Light {}
//!
//! let direct: Arc<dyn Entity> = Arc::new(Light { name: "porch".into() });
//! let boxed: Arc<dyn Entity> = Arc::new(Box::new(Light { name: "hall".into() }));
//!
//! assert_eq!(direct.entity_type(), EntityType::of::<Light>());
//! assert_eq!(boxed.entity_type(), direct.entity_type());
//! assert!(boxed.as_any().downcast_ref::<Light>().is_some());
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Stable identifier of a concrete entity type.
///
/// Equality and hashing consider the [`TypeId`] only; the name is carried
/// for log and error messages.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    /// Returns the tag for `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (`Light` for `home::devices::Light`).
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityType({})", self.name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Blanket helper giving every sized `'static` type a type tag and an
/// `Any` view. [`Entity`]'s default methods forward here.
pub trait AsAnyEntity: Any {
    /// Tag of the implementing type.
    fn type_tag(&self) -> EntityType;

    /// The value as `&dyn Any`.
    fn any_ref(&self) -> &dyn Any;
}

impl<T: Any> AsAnyEntity for T {
    fn type_tag(&self) -> EntityType {
        EntityType::of::<T>()
    }

    fn any_ref(&self) -> &dyn Any {
        self
    }
}

/// A domain value that can be shown in an entity list.
///
/// Implementing the trait is usually a one-liner; the defaults report the
/// implementing type. Override both methods together when a type forwards
/// to an inner value, as the pointer implementations below do.
pub trait Entity: AsAnyEntity + Send + Sync {
    /// The concrete type renderers are registered against.
    fn entity_type(&self) -> EntityType {
        self.type_tag()
    }

    /// The value a renderer receives.
    fn as_any(&self) -> &dyn Any {
        self.any_ref()
    }
}

impl<T: Entity + ?Sized> Entity for Arc<T> {
    fn entity_type(&self) -> EntityType {
        (**self).entity_type()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn entity_type(&self) -> EntityType {
        (**self).entity_type()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}
