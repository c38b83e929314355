//! Per-class capabilities.
//!
//! Objects are plain property bags whatever their class. Behaviour that only
//! makes sense for some classes (which properties they must carry, whether
//! they join two nodes) is looked up by class name in a [`ClassRegistry`].
//! Classes without an entry get [`BaseClass`], which adds nothing.

use std::collections::HashMap;

/// Capabilities attached to a class name.
pub trait ClassBehavior: Send + Sync {
    /// Properties every object of the class is expected to carry.
    fn required_properties(&self) -> &[&'static str] {
        &[]
    }

    /// Whether the class joins two nodes through `from` / `to`.
    fn is_link(&self) -> bool {
        false
    }

    /// Whether the class hangs off another object through `parent`.
    fn is_attached(&self) -> bool {
        false
    }
}

/// Fallback for classes with no registered behaviour.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseClass;

impl ClassBehavior for BaseClass {}

/// Buses: nodes, meters and loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeClass;

impl ClassBehavior for NodeClass {
    fn required_properties(&self) -> &[&'static str] {
        &["name"]
    }
}

/// Two-terminal equipment: lines, transformers, switches.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkClass;

impl ClassBehavior for LinkClass {
    fn required_properties(&self) -> &[&'static str] {
        &["from", "to"]
    }

    fn is_link(&self) -> bool {
        true
    }
}

/// Equipment and instruments attached to a parent object.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachedClass;

impl ClassBehavior for AttachedClass {
    fn required_properties(&self) -> &[&'static str] {
        &["parent"]
    }

    fn is_attached(&self) -> bool {
        true
    }
}

const NODE_CLASSES: [&str; 7] = [
    "node",
    "meter",
    "load",
    "triplex_node",
    "triplex_meter",
    "triplex_load",
    "substation",
];

const LINK_CLASSES: [&str; 9] = [
    "overhead_line",
    "underground_line",
    "triplex_line",
    "transformer",
    "regulator",
    "switch",
    "fuse",
    "recloser",
    "sectionalizer",
];

const ATTACHED_CLASSES: [&str; 6] = [
    "recorder",
    "player",
    "inverter",
    "solar",
    "house",
    "collector",
];

pub struct ClassRegistry {
    behaviors: HashMap<String, Box<dyn ClassBehavior>>,
    base: BaseClass,
}

impl ClassRegistry {
    /// Registry with no entries; every class resolves to [`BaseClass`].
    pub fn empty() -> Self {
        Self {
            behaviors: HashMap::new(),
            base: BaseClass,
        }
    }

    /// Registry pre-filled with the distribution classes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for class in NODE_CLASSES {
            registry.register(class, NodeClass);
        }
        for class in LINK_CLASSES {
            registry.register(class, LinkClass);
        }
        for class in ATTACHED_CLASSES {
            registry.register(class, AttachedClass);
        }
        registry
    }

    pub fn register(&mut self, class: impl Into<String>, behavior: impl ClassBehavior + 'static) {
        self.behaviors.insert(class.into(), Box::new(behavior));
    }

    pub fn behavior(&self, class: &str) -> &dyn ClassBehavior {
        self.behaviors
            .get(class)
            .map(|b| b.as_ref())
            .unwrap_or(&self.base)
    }

    pub fn is_registered(&self, class: &str) -> bool {
        self.behaviors.contains_key(class)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut classes: Vec<&String> = self.behaviors.keys().collect();
        classes.sort();
        f.debug_struct("ClassRegistry")
            .field("classes", &classes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Capacitor;

    impl ClassBehavior for Capacitor {
        fn required_properties(&self) -> &[&'static str] {
            &["parent", "capacitor_A"]
        }
    }

    #[test]
    fn unknown_class_falls_back_to_base() {
        let registry = ClassRegistry::with_defaults();
        let behavior = registry.behavior("climate");
        assert!(behavior.required_properties().is_empty());
        assert!(!behavior.is_link());
        assert!(!registry.is_registered("climate"));
    }

    #[test]
    fn defaults_cover_links_and_attachments() {
        let registry = ClassRegistry::with_defaults();
        assert!(registry.behavior("transformer").is_link());
        assert!(registry.behavior("recorder").is_attached());
        assert_eq!(registry.behavior("meter").required_properties(), ["name"]);
    }

    #[test]
    fn custom_behavior_can_be_registered() {
        let mut registry = ClassRegistry::empty();
        registry.register("capacitor", Capacitor);
        assert_eq!(
            registry.behavior("capacitor").required_properties(),
            ["parent", "capacitor_A"]
        );
    }
}
