//! The per-object settings tool.
//!
//! The tool itself holds almost no state: it reads the selection on demand
//! and tracks just enough host state to decide whether it should be offered
//! to the user at all.

use crate::scene::{NodeId, Selection, SettingOverrideDecorator};

/// Preference holding the settings-panel mode; `1` means advanced.
pub const ACTIVE_MODE_PREFERENCE: &str = "cura/active_mode";

/// Properties the tool exposes to its UI panel.
pub const EXPOSED_PROPERTIES: [&str; 3] =
    ["SelectedObjectId", "ContainerID", "SelectedActiveExtruder"];

/// Errors from tool operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// The operation needs a selected object and nothing is selected.
    #[error("no object selected")]
    NoSelection,

    /// The requested property is not exposed by this tool.
    #[error("unknown property: {0}")]
    UnknownProperty(String),
}

/// The application the tool is plugged into.
pub trait ToolHost {
    /// Integer value of a preference, if set.
    fn preference(&self, key: &str) -> Option<i64>;

    /// `machine_extruder_count` of the global stack, or `None` when no
    /// machine is active.
    fn machine_extruder_count(&self) -> Option<u32>;

    /// Tell the UI whether the tool identified by `plugin_id` is usable.
    fn tool_enabled_changed(&mut self, plugin_id: &str, enabled: bool);

    /// Tell the UI that exposed property values may have changed.
    fn property_changed(&mut self);
}

/// Value of an exposed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// `SelectedObjectId`.
    ObjectId(Option<NodeId>),
    /// `ContainerID`; empty when the object has no override stack.
    ContainerId(String),
    /// `SelectedActiveExtruder`.
    ActiveExtruder(Option<String>),
}

/// Lets the user override print settings on individual objects.
///
/// The tool is enabled whenever the settings panel is in advanced mode or
/// the active machine has more than one extruder.
#[derive(Debug, Clone)]
pub struct PerObjectSettingsTool {
    plugin_id: String,
    advanced_mode: bool,
    multi_extrusion: bool,
}

impl PerObjectSettingsTool {
    /// Create the tool and report its initial enabled state to `host`.
    pub fn new<H: ToolHost + ?Sized>(plugin_id: impl Into<String>, host: &mut H) -> Self {
        let mut tool = Self {
            plugin_id: plugin_id.into(),
            advanced_mode: false,
            multi_extrusion: false,
        };
        tool.on_preference_changed(ACTIVE_MODE_PREFERENCE, host);
        tool.on_global_container_changed(host);
        tool
    }

    /// Plugin id the enabled state is reported under.
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Whether the tool should currently be offered.
    pub fn is_enabled(&self) -> bool {
        self.advanced_mode || self.multi_extrusion
    }

    /// Handle a scene interaction event. The tool never consumes events.
    pub fn event<E>(&mut self, _event: &E) -> bool {
        false
    }

    // ── Exposed properties ──────────────────────────────────────────────

    /// Id of the first selected object.
    pub fn selected_object_id<S: Selection + ?Sized>(&self, selection: &S) -> Option<NodeId> {
        selection.selected_object(0).map(|node| node.id())
    }

    /// Id of the first selected object's override stack, or `""`.
    pub fn container_id<S: Selection + ?Sized>(&self, selection: &S) -> String {
        selection
            .selected_object(0)
            .and_then(|node| node.stack())
            .map(|stack| stack.id().to_string())
            .unwrap_or_default()
    }

    /// Active extruder of the first selected object.
    pub fn selected_active_extruder<S: Selection + ?Sized>(&self, selection: &S) -> Option<String> {
        selection
            .selected_object(0)
            .and_then(|node| node.active_extruder())
            .map(str::to_string)
    }

    /// Make the first selected object print with `extruder_stack_id`.
    ///
    /// An override decorator is attached first if the object has none.
    pub fn set_selected_active_extruder<S: Selection + ?Sized>(
        &self,
        selection: &mut S,
        extruder_stack_id: &str,
    ) -> Result<(), ToolError> {
        let node = selection
            .selected_object_mut(0)
            .ok_or(ToolError::NoSelection)?;
        if node.stack().is_none() {
            log::debug!("Adding setting override decorator to node {}", node.id());
            node.add_decorator(SettingOverrideDecorator::for_node(node.id()));
        }
        if let Some(decorator) = node.decorator_mut() {
            decorator.set_active_extruder(extruder_stack_id);
        }
        Ok(())
    }

    /// Read an exposed property by name.
    pub fn property<S: Selection + ?Sized>(
        &self,
        name: &str,
        selection: &S,
    ) -> Result<PropertyValue, ToolError> {
        match name {
            "SelectedObjectId" => Ok(PropertyValue::ObjectId(self.selected_object_id(selection))),
            "ContainerID" => Ok(PropertyValue::ContainerId(self.container_id(selection))),
            "SelectedActiveExtruder" => Ok(PropertyValue::ActiveExtruder(
                self.selected_active_extruder(selection),
            )),
            _ => Err(ToolError::UnknownProperty(name.to_string())),
        }
    }

    // ── Host notifications ──────────────────────────────────────────────

    /// The selection changed; exposed properties must be re-read.
    pub fn on_selection_changed<H: ToolHost + ?Sized>(&self, host: &mut H) {
        host.property_changed();
    }

    /// A preference changed. Only [`ACTIVE_MODE_PREFERENCE`] is relevant.
    pub fn on_preference_changed<H: ToolHost + ?Sized>(&mut self, key: &str, host: &mut H) {
        if key != ACTIVE_MODE_PREFERENCE {
            return;
        }
        self.advanced_mode = host.preference(key) == Some(1);
        self.update_enabled(host);
    }

    /// The active machine changed. Ignored while no machine is active.
    pub fn on_global_container_changed<H: ToolHost + ?Sized>(&mut self, host: &mut H) {
        let Some(extruders) = host.machine_extruder_count() else {
            return;
        };
        self.multi_extrusion = extruders > 1;
        self.update_enabled(host);
    }

    fn update_enabled<H: ToolHost + ?Sized>(&self, host: &mut H) {
        let enabled = self.is_enabled();
        log::debug!("{} enabled: {enabled}", self.plugin_id);
        host.tool_enabled_changed(&self.plugin_id, enabled);
    }
}
