//! Per-object setting overrides.
//!
//! Each scene object can carry a [`SettingOverrideDecorator`] holding its own
//! override stack and the extruder it prints with. The
//! [`PerObjectSettingsTool`] exposes those to a UI panel and decides when the
//! panel is offered. The host application is reached only through the
//! [`ToolHost`] and [`Selection`] traits.

mod scene;
mod tool;

pub use scene::{NodeId, OverrideStack, Scene, SceneNode, Selection, SettingOverrideDecorator};
pub use tool::{
    ACTIVE_MODE_PREFERENCE, EXPOSED_PROPERTIES, PerObjectSettingsTool, PropertyValue, ToolError,
    ToolHost,
};
