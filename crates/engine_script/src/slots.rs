//! Native script slot tables.
//!
//! A [`NativeScripts`] table attaches up to `N` scripts to one owning
//! [`GameObject`]. Each slot moves through
//! `Unregistered → Registered → Instantiated → Destroyed`:
//!
//! - [`NativeScripts::declare`] binds a name to the next free slot.
//! - [`NativeScripts::instantiate_all`] asks the [`ScriptRegistry`] for an
//!   instance per declared slot and calls [`Script::start`] on it. A name the
//!   registry does not know is logged and its slot stays `Registered`.
//! - [`NativeScripts::destroy_all`] calls [`Script::stop`] once per instance
//!   and drops it.
//!
//! Capacity is fixed at compile time and the slots live inline, so attaching
//! scripts never reallocates.

use tracing::{debug, error};

use engine_scene::GameObject;

use crate::error::ScriptError;
use crate::registry::{ScriptInstance, ScriptRegistry};
use crate::script::{Script, ScriptContext};

/// Default slot capacity of a [`NativeScripts`] table.
pub const MAX_SCRIPTS: usize = 100;

/// Lifecycle state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No script declared at this index.
    Unregistered,
    /// A name is bound but no instance exists.
    Registered,
    /// A live instance occupies the slot.
    Instantiated,
    /// The instance was stopped and dropped.
    Destroyed,
}

#[derive(Debug)]
struct Slot {
    name: String,
    instance: Option<ScriptInstance>,
    destroyed: bool,
}

impl Slot {
    fn state(&self) -> SlotState {
        if self.instance.is_some() {
            SlotState::Instantiated
        } else if self.destroyed {
            SlotState::Destroyed
        } else {
            SlotState::Registered
        }
    }
}

/// A fixed-capacity table of scripts attached to one game object.
#[derive(Debug)]
pub struct NativeScripts<const N: usize = MAX_SCRIPTS> {
    owner: GameObject,
    slots: [Option<Slot>; N],
    declared: usize,
}

impl<const N: usize> NativeScripts<N> {
    /// Create an empty table attached to `owner`.
    #[must_use]
    pub fn new(owner: GameObject) -> Self {
        Self {
            owner,
            slots: std::array::from_fn(|_| None),
            declared: 0,
        }
    }

    /// The game object these scripts are attached to.
    #[must_use]
    pub fn owner(&self) -> &GameObject {
        &self.owner
    }

    /// Bind `name` to the next free slot and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::AlreadyRegistered`] if `name` is already
    /// declared here, or [`ScriptError::CapacityExceeded`] if every slot is
    /// taken. The table is unchanged on error.
    pub fn declare(&mut self, name: impl Into<String>) -> Result<usize, ScriptError> {
        let name = name.into();
        if let Some(index) = self.index_of(&name) {
            return Err(ScriptError::AlreadyRegistered { name, index });
        }
        if self.declared == N {
            return Err(ScriptError::CapacityExceeded { name, capacity: N });
        }

        let index = self.declared;
        debug!(owner = %self.owner.entity(), script = %name, index, "script slot declared");
        self.slots[index] = Some(Slot {
            name,
            instance: None,
            destroyed: false,
        });
        self.declared += 1;
        Ok(index)
    }

    /// Instantiate every `Registered` slot.
    ///
    /// Slots whose name the registry does not know are logged and left
    /// `Registered`. Returns the number of slots instantiated by this call.
    pub fn instantiate_all(&mut self, registry: &ScriptRegistry) -> usize {
        let mut count = 0;
        for index in 0..self.declared {
            if self.state(index) == SlotState::Registered
                && self.instantiate_one(index, registry).is_ok()
            {
                count += 1;
            }
        }
        count
    }

    /// Instantiate the script declared at `index` and call its `start` hook.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::InvalidSlot`], [`ScriptError::AlreadyInstantiated`],
    /// [`ScriptError::SlotDestroyed`], or [`ScriptError::NotRegistered`] (which
    /// is also logged). The slot is unchanged on error.
    pub fn instantiate_one(
        &mut self,
        index: usize,
        registry: &ScriptRegistry,
    ) -> Result<(), ScriptError> {
        let owner = &self.owner;
        let slot = self
            .slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(ScriptError::InvalidSlot { index })?;

        match slot.state() {
            SlotState::Instantiated => return Err(ScriptError::AlreadyInstantiated { index }),
            SlotState::Destroyed => return Err(ScriptError::SlotDestroyed { index }),
            SlotState::Registered | SlotState::Unregistered => {}
        }

        let mut instance = registry.instantiate(&slot.name).inspect_err(|err| {
            error!(owner = %owner.entity(), script = %slot.name, index, %err, "couldn't instantiate script");
        })?;

        instance
            .script_mut()
            .start(&ScriptContext::new(owner, 0.0, 0));
        slot.instance = Some(instance);
        debug!(owner = %owner.entity(), script = %slot.name, index, "script started");
        Ok(())
    }

    /// Call [`Script::update`] on every live instance, in slot order.
    pub fn update_all(&mut self, dt: f32, frame: u64) {
        let ctx = ScriptContext::new(&self.owner, dt, frame);
        for instance in self.slots.iter_mut().flatten().filter_map(|s| s.instance.as_mut()) {
            instance.script_mut().update(&ctx);
        }
    }

    /// Call [`Script::fixed_update`] on every live instance, in slot order.
    pub fn fixed_update_all(&mut self, dt: f32, frame: u64) {
        let ctx = ScriptContext::new(&self.owner, dt, frame);
        for instance in self.slots.iter_mut().flatten().filter_map(|s| s.instance.as_mut()) {
            instance.script_mut().fixed_update(&ctx);
        }
    }

    /// Stop and drop every live instance, marking its slot `Destroyed`.
    ///
    /// Safe to call repeatedly. Returns the number of instances destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let ctx = ScriptContext::new(&self.owner, 0.0, 0);
        let mut count = 0;
        for slot in self.slots.iter_mut().flatten() {
            if let Some(mut instance) = slot.instance.take() {
                instance.script_mut().stop(&ctx);
                slot.destroyed = true;
                count += 1;
            }
        }
        if count > 0 {
            debug!(owner = %self.owner.entity(), count, "scripts destroyed");
        }
        count
    }

    /// The state of the slot at `index`.
    #[must_use]
    pub fn state(&self, index: usize) -> SlotState {
        match self.slots.get(index) {
            Some(Some(slot)) => slot.state(),
            _ => SlotState::Unregistered,
        }
    }

    /// The script name bound to `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.slots.get(index)?.as_ref().map(|s| s.name.as_str())
    }

    /// The slot index `name` is declared at.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots[..self.declared]
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.name == name))
    }

    /// The live script at `index`.
    #[must_use]
    pub fn script(&self, index: usize) -> Option<&(dyn Script + 'static)> {
        let slot = self.slots.get(index)?.as_ref()?;
        slot.instance.as_ref().map(ScriptInstance::script)
    }

    /// The live script at `index`, downcast to `S`.
    #[must_use]
    pub fn get<S: Script>(&self, index: usize) -> Option<&S> {
        self.script(index)?.downcast_ref()
    }

    /// The live script at `index`, downcast mutably to `S`.
    pub fn get_mut<S: Script>(&mut self, index: usize) -> Option<&mut S> {
        let slot = self.slots.get_mut(index)?.as_mut()?;
        slot.instance.as_mut()?.script_mut().downcast_mut()
    }

    /// Number of declared slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declared
    }

    /// Returns `true` if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared == 0
    }

    /// The fixed slot capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of slots holding a live instance.
    #[must_use]
    pub fn instantiated_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.instance.is_some())
            .count()
    }
}

impl<const N: usize> Default for NativeScripts<N> {
    fn default() -> Self {
        Self::new(GameObject::default())
    }
}

impl<const N: usize> Drop for NativeScripts<N> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}
