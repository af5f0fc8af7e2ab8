//! The behaviour-component contract.
//!
//! Every behaviour attached to a [`GameObject`] implements [`GameComponent`]:
//! lifecycle hooks (`awake`, `update`), a debug-UI hook (`render_imgui`) and
//! JSON serialization (`to_json`). Concrete types additionally implement
//! [`ComponentType`], which carries the static type name used as the JSON
//! `"type"` tag and the `from_json` factory the
//! [`ComponentRegistry`](crate::scene::registry::ComponentRegistry) calls.
//!
//! Components never own their game object. The owner is recorded in
//! [`ComponentBase::owner`] as a [`GameObjectId`], and references to sibling
//! components are kept as [`ComponentRef`]s that must be re-resolved through
//! the owner every time they are used.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::error::Result;
use crate::resources::input::InputState;
use crate::scene::gameobject::{GameObject, GameObjectId};

/// Object-safe access to [`Any`] for downcasting boxed components.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// State shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBase {
    /// Gates `update` calls.
    pub enabled: bool,
    /// Owning game object, set on attach and cleared on detach.
    pub owner: Option<GameObjectId>,
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self {
            enabled: true,
            owner: None,
        }
    }
}

/// Identifier of a component slot, unique within its owning game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Typed, non-owning reference to a sibling component.
///
/// Resolve it with [`GameObject::resolve`] / [`GameObject::resolve_mut`];
/// resolution fails once the referenced component has been removed.
pub struct ComponentRef<T> {
    id: ComponentId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentRef<T> {
    pub(crate) fn new(id: ComponentId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }
}

impl<T> Clone for ComponentRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentRef<T> {}

impl<T> PartialEq for ComponentRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> fmt::Debug for ComponentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("type", &std::any::type_name::<T>())
            .field("id", &self.id)
            .finish()
    }
}

/// What a component sees while it updates: its owner (with the updating
/// component's own slot vacated) and this frame's input snapshot.
pub struct ComponentContext<'a> {
    owner: &'a mut GameObject,
    input: &'a InputState,
}

impl<'a> ComponentContext<'a> {
    pub fn new(owner: &'a mut GameObject, input: &'a InputState) -> Self {
        Self { owner, input }
    }

    pub fn owner(&self) -> &GameObject {
        self.owner
    }

    pub fn owner_mut(&mut self) -> &mut GameObject {
        self.owner
    }

    pub fn input(&self) -> &InputState {
        self.input
    }
}

/// Polymorphic capability contract implemented by every behaviour.
pub trait GameComponent: AsAny + Send + Sync {
    /// Stable type name, identical to [`ComponentType::TYPE_NAME`].
    fn type_name(&self) -> &'static str;

    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Called once after the component is attached, before its first
    /// update. Used to look up sibling components; other siblings may or may
    /// not have run their own `awake` yet.
    fn awake(&mut self, _owner: &GameObject) {}

    /// Called once per frame while enabled. `delta_time` is in seconds and
    /// may be zero.
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {}

    /// Draw debug widgets for the component's tunable state.
    fn render_imgui(&mut self, _ui: &imgui::Ui) {}

    /// Serialize the tunable state. Identical state yields identical JSON.
    fn to_json(&self) -> Value;

    fn is_enabled(&self) -> bool {
        self.base().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().enabled = enabled;
    }

    fn owner(&self) -> Option<GameObjectId> {
        self.base().owner
    }
}

/// Static half of the contract: type identity and the JSON factory.
pub trait ComponentType: GameComponent + Sized {
    const TYPE_NAME: &'static str;

    /// Build a component from a blob produced by [`GameComponent::to_json`].
    /// Fails with [`LoadError::MissingField`](crate::error::LoadError::MissingField)
    /// when a required key is absent.
    fn from_json(blob: &Value) -> Result<Self>;
}
