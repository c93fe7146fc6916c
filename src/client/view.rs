use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Class carried by an element while it is hidden
pub const HIDDEN_CLASS: &str = "d-none";
/// Class carried by an element while it is shown
pub const VISIBLE_CLASS: &str = "d-block";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Element '{0}' is no longer attached to the view")]
    Detached(String),
}

/// Opaque reference to an element of the view, obtained through [`ViewModel::get_element`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Capability object standing in for the page the gallery is rendered on.
///
/// Methods take `&self` so a single view can be shared by several in-flight
/// interactions; implementations provide their own interior mutability.
pub trait ViewModel: Send + Sync {
    fn get_element(&self, id: &str) -> Option<ElementHandle>;

    /// Detach the element from the view. Fails when it was already removed.
    fn remove(&self, handle: &ElementHandle) -> Result<(), ViewError>;

    fn value(&self, handle: &ElementHandle) -> String;

    fn set_attribute(&self, handle: &ElementHandle, name: &str, value: &str);

    fn remove_attribute(&self, handle: &ElementHandle, name: &str);

    fn add_classes(&self, handle: &ElementHandle, classes: &[&str]);

    fn remove_classes(&self, handle: &ElementHandle, classes: &[&str]);

    /// Switch the hidden/visible class pair.
    fn set_display(&self, handle: &ElementHandle, visible: bool) {
        if visible {
            self.remove_classes(handle, &[HIDDEN_CLASS]);
            self.add_classes(handle, &[VISIBLE_CLASS]);
        } else {
            self.remove_classes(handle, &[VISIBLE_CLASS]);
            self.add_classes(handle, &[HIDDEN_CLASS]);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub value: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_visible(&self) -> bool {
        !self.has_class(HIDDEN_CLASS)
    }
}

/// In-memory view keyed by element id.
#[derive(Debug, Default)]
pub struct Document {
    elements: Mutex<HashMap<String, Element>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view holding a card and a hidden error indicator for every resource.
    pub fn with_resources<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let document = Self::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            document.insert(format!("{}_card", identifier), Element::new().with_class("card"));
            document.insert(
                format!("{}_error", identifier),
                Element::new().with_class("text-danger").with_class(HIDDEN_CLASS),
            );
        }
        document
    }

    pub fn insert(&self, id: impl Into<String>, element: Element) {
        self.lock().insert(id.into(), element);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Snapshot of an element's current state
    pub fn element(&self, id: &str) -> Option<Element> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Element>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, handle: &ElementHandle, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.lock().get_mut(handle.id()) {
            f(element);
        }
    }
}

impl ViewModel for Document {
    fn get_element(&self, id: &str) -> Option<ElementHandle> {
        self.lock().contains_key(id).then(|| ElementHandle::new(id))
    }

    fn remove(&self, handle: &ElementHandle) -> Result<(), ViewError> {
        self.lock()
            .remove(handle.id())
            .map(|_| ())
            .ok_or_else(|| ViewError::Detached(handle.id().to_string()))
    }

    fn value(&self, handle: &ElementHandle) -> String {
        self.lock()
            .get(handle.id())
            .map(|element| element.value.clone())
            .unwrap_or_default()
    }

    fn set_attribute(&self, handle: &ElementHandle, name: &str, value: &str) {
        self.update(handle, |element| {
            element.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn remove_attribute(&self, handle: &ElementHandle, name: &str) {
        self.update(handle, |element| {
            element.attributes.remove(name);
        });
    }

    fn add_classes(&self, handle: &ElementHandle, classes: &[&str]) {
        self.update(handle, |element| {
            element.classes.extend(classes.iter().map(|c| c.to_string()));
        });
    }

    fn remove_classes(&self, handle: &ElementHandle, classes: &[&str]) {
        self.update(handle, |element| {
            for class in classes {
                element.classes.remove(*class);
            }
        });
    }
}
