//! Capability descriptors and capability-set discovery
//!
//! Rust has no runtime reflection over implemented traits, so structural
//! type information is supplied explicitly: every capability trait and
//! every proxied concrete type carries a static [`TypeDescriptor`]
//! (normally generated by `capability!` and `concrete!`).

use crate::errors::{InteractError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Kind of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// A capability trait; may be exposed through a proxy
    Capability,

    /// A concrete implementation type
    Concrete,
}

/// Static structural description of a type
pub struct TypeDescriptor {
    /// Short name
    pub name: &'static str,

    /// Module-qualified path; identity of the descriptor
    pub path: &'static str,

    /// Capability or concrete
    pub kind: TypeKind,

    /// Direct supertypes (inherited capabilities, or capabilities a concrete type implements)
    pub supertypes: &'static [&'static TypeDescriptor],

    /// Method names declared directly on this capability
    pub methods: &'static [&'static str],
}

impl TypeDescriptor {
    /// Describe a capability trait
    pub const fn capability(
        name: &'static str,
        path: &'static str,
        supertypes: &'static [&'static TypeDescriptor],
        methods: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            path,
            kind: TypeKind::Capability,
            supertypes,
            methods,
        }
    }

    /// Describe a concrete type
    pub const fn concrete(
        name: &'static str,
        path: &'static str,
        supertypes: &'static [&'static TypeDescriptor],
    ) -> Self {
        Self {
            name,
            path,
            kind: TypeKind::Concrete,
            supertypes,
            methods: &[],
        }
    }

    /// Check if this descriptor is a capability
    pub fn is_capability(&self) -> bool {
        self.kind == TypeKind::Capability
    }

    /// Check if this descriptor declares `method`
    pub fn declares(&self, method: &str) -> bool {
        self.methods.contains(&method)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supertypes: Vec<_> = self.supertypes.iter().map(|s| s.name).collect();
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("supertypes", &supertypes)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Types carrying a static descriptor.
///
/// Capability traits implement this on `dyn Trait`; concrete types on
/// themselves.
pub trait Described {
    /// Descriptor of the implementing type
    const DESCRIPTOR: &'static TypeDescriptor;
}

/// Descriptor of `T`
pub fn descriptor_of<T: ?Sized + Described>() -> &'static TypeDescriptor {
    T::DESCRIPTOR
}

/// Capabilities exposed by one proxy, fixed at construction
#[derive(Debug, Clone)]
pub struct CapabilitySet {
    owner: &'static str,
    capabilities: Vec<&'static TypeDescriptor>,
}

impl CapabilitySet {
    /// The requested capability plus everything it inherits
    pub fn of_capability(requested: &'static TypeDescriptor) -> Result<Self> {
        ensure_capability(requested)?;
        Self::discover(requested.name, &[requested])
    }

    /// Every capability reachable from `implementation`, transitively
    pub fn of_implementation(implementation: &'static TypeDescriptor) -> Result<Self> {
        Self::discover(implementation.name, &[implementation])
    }

    /// A caller-supplied capability list and everything it inherits
    pub fn explicit(capabilities: &[&'static TypeDescriptor]) -> Result<Self> {
        for capability in capabilities {
            ensure_capability(capability)?;
        }
        let owner = capabilities.first().map_or("<explicit>", |c| c.name);
        Self::discover(owner, capabilities)
    }

    fn discover(owner: &'static str, roots: &[&'static TypeDescriptor]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut capabilities = Vec::new();
        for root in roots {
            collect(root, &mut seen, &mut capabilities);
        }

        if capabilities.is_empty() {
            return Err(InteractError::EmptyCapabilitySet {
                type_name: owner.to_string(),
            });
        }

        Ok(Self {
            owner,
            capabilities,
        })
    }

    /// Name of the type the set was discovered from
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Check membership
    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.capabilities.iter().any(|c| *c == descriptor)
    }

    /// Check membership of `Cap`
    pub fn includes<Cap: ?Sized + Described>(&self) -> bool {
        self.contains(Cap::DESCRIPTOR)
    }

    /// Iterate capabilities in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeDescriptor> + '_ {
        self.capabilities.iter().copied()
    }

    /// Capability names in discovery order
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|c| c.name).collect()
    }

    /// Number of capabilities
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

fn ensure_capability(descriptor: &TypeDescriptor) -> Result<()> {
    if descriptor.is_capability() {
        Ok(())
    } else {
        Err(InteractError::InvalidCapability {
            type_name: descriptor.name.to_string(),
        })
    }
}

/// Depth-first, declaration order, de-duplicated by path
fn collect(
    descriptor: &'static TypeDescriptor,
    seen: &mut HashSet<&'static str>,
    out: &mut Vec<&'static TypeDescriptor>,
) {
    if !seen.insert(descriptor.path) {
        return;
    }
    if descriptor.is_capability() {
        out.push(descriptor);
    }
    for supertype in descriptor.supertypes {
        collect(supertype, seen, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE: TypeDescriptor = TypeDescriptor::capability("Node", "t::Node", &[], &["id"]);
    const CLICK: TypeDescriptor =
        TypeDescriptor::capability("Click", "t::Click", &[&NODE], &["click"]);
    const TEXT: TypeDescriptor =
        TypeDescriptor::capability("Text", "t::Text", &[&NODE], &["text"]);
    const BASE: TypeDescriptor = TypeDescriptor::concrete("Base", "t::Base", &[&CLICK]);
    const BUTTON: TypeDescriptor = TypeDescriptor::concrete("Button", "t::Button", &[&BASE, &TEXT]);
    const BARE: TypeDescriptor = TypeDescriptor::concrete("Bare", "t::Bare", &[]);

    #[test]
    fn test_of_capability_includes_inherited() {
        let set = CapabilitySet::of_capability(&CLICK).unwrap();
        assert_eq!(set.names(), vec!["Click", "Node"]);
        assert!(set.contains(&NODE));
        assert!(!set.contains(&TEXT));
    }

    #[test]
    fn test_of_capability_rejects_concrete() {
        let err = CapabilitySet::of_capability(&BUTTON).unwrap_err();
        assert!(matches!(err, InteractError::InvalidCapability { type_name } if type_name == "Button"));
    }

    #[test]
    fn test_of_implementation_walks_concrete_supertypes() {
        let set = CapabilitySet::of_implementation(&BUTTON).unwrap();
        // Node reached through Click first, then skipped under Text
        assert_eq!(set.names(), vec!["Click", "Node", "Text"]);
        assert_eq!(set.owner(), "Button");
    }

    #[test]
    fn test_of_implementation_empty() {
        let err = CapabilitySet::of_implementation(&BARE).unwrap_err();
        assert!(matches!(err, InteractError::EmptyCapabilitySet { type_name } if type_name == "Bare"));
    }

    #[test]
    fn test_explicit() {
        let set = CapabilitySet::explicit(&[&TEXT, &CLICK]).unwrap();
        assert_eq!(set.names(), vec!["Text", "Node", "Click"]);

        assert!(matches!(
            CapabilitySet::explicit(&[&TEXT, &BASE]),
            Err(InteractError::InvalidCapability { .. })
        ));
        assert!(matches!(
            CapabilitySet::explicit(&[]),
            Err(InteractError::EmptyCapabilitySet { .. })
        ));
    }

    #[test]
    fn test_descriptor_identity_and_methods() {
        assert_eq!(CLICK, CLICK);
        assert_ne!(CLICK, TEXT);
        assert!(CLICK.declares("click"));
        assert!(!CLICK.declares("id"));
        assert!(format!("{:?}", BUTTON).contains("Base"));
    }
}
