//! Scene objects and the per-object override decorator.

use gcode_settings_container::InstanceContainer;

/// Identifier of a scene object, stable for the object's lifetime.
pub type NodeId = u64;

/// A stack of setting overrides attached to one scene object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideStack {
    id: String,
    overrides: InstanceContainer,
}

impl OverrideStack {
    /// Create an empty stack. Its override container is `<id>_settings`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut overrides = InstanceContainer::new(format!("{id}_settings"));
        overrides.set_metadata_entry("type", "user");
        Self { id, overrides }
    }

    /// Stack id, exposed to the UI as `ContainerID`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The per-object setting values.
    pub fn overrides(&self) -> &InstanceContainer {
        &self.overrides
    }

    /// Mutable access to the per-object setting values.
    pub fn overrides_mut(&mut self) -> &mut InstanceContainer {
        &mut self.overrides
    }
}

/// Attaches an [`OverrideStack`] and an active extruder to a scene object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingOverrideDecorator {
    stack: OverrideStack,
    active_extruder: Option<String>,
}

impl SettingOverrideDecorator {
    /// Decorator for the node `node_id`, with a fresh stack and no extruder.
    pub fn for_node(node_id: NodeId) -> Self {
        Self {
            stack: OverrideStack::new(format!("per_object_stack_{node_id}")),
            active_extruder: None,
        }
    }

    /// The override stack.
    pub fn stack(&self) -> &OverrideStack {
        &self.stack
    }

    /// Mutable access to the override stack.
    pub fn stack_mut(&mut self) -> &mut OverrideStack {
        &mut self.stack
    }

    /// Id of the extruder stack this object prints with, if assigned.
    pub fn active_extruder(&self) -> Option<&str> {
        self.active_extruder.as_deref()
    }

    /// Assign the extruder stack this object prints with.
    pub fn set_active_extruder(&mut self, extruder_stack_id: impl Into<String>) {
        self.active_extruder = Some(extruder_stack_id.into());
    }
}

/// A printable object in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    decorator: Option<SettingOverrideDecorator>,
}

impl SceneNode {
    /// Create an undecorated node.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            decorator: None,
        }
    }

    /// Node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display name (usually the mesh file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The override decorator, if one is attached.
    pub fn decorator(&self) -> Option<&SettingOverrideDecorator> {
        self.decorator.as_ref()
    }

    /// Mutable access to the override decorator.
    pub fn decorator_mut(&mut self) -> Option<&mut SettingOverrideDecorator> {
        self.decorator.as_mut()
    }

    /// Attach `decorator`, replacing any existing one.
    pub fn add_decorator(&mut self, decorator: SettingOverrideDecorator) {
        self.decorator = Some(decorator);
    }

    /// The override stack, if decorated.
    pub fn stack(&self) -> Option<&OverrideStack> {
        self.decorator.as_ref().map(SettingOverrideDecorator::stack)
    }

    /// The active extruder, if decorated and assigned.
    pub fn active_extruder(&self) -> Option<&str> {
        self.decorator
            .as_ref()
            .and_then(SettingOverrideDecorator::active_extruder)
    }
}

/// Access to the objects the user has selected, in selection order.
pub trait Selection {
    /// The `index`-th selected object.
    fn selected_object(&self, index: usize) -> Option<&SceneNode>;

    /// Mutable access to the `index`-th selected object.
    fn selected_object_mut(&mut self, index: usize) -> Option<&mut SceneNode>;
}

/// Minimal scene: a list of nodes plus the ids of the selected ones.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    selected: Vec<NodeId>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the scene.
    pub fn add(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Add `id` to the selection. Returns `false` if no such node exists.
    pub fn select(&mut self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        true
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}

impl Selection for Scene {
    fn selected_object(&self, index: usize) -> Option<&SceneNode> {
        let id = *self.selected.get(index)?;
        self.node(id)
    }

    fn selected_object_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        let id = *self.selected.get(index)?;
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}
