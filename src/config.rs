//! Configuration.
//!
//! The attribute slot table is the contract between mesh uploads and the
//! shader layer: the vertex shader must declare `layout(location = N)`
//! inputs at exactly these slots. All structs deserialize from JSON with
//! every field optional.

use serde::Deserialize;

use crate::abs::DrawMode;
use crate::error::{MeshError, Result};

/// Vertex attribute locations used when binding mesh buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributeSlots {
    pub position: u32,
    pub normal: u32,
    pub uv: u32,
    pub color: u32,
}

impl Default for AttributeSlots {
    fn default() -> Self {
        Self {
            position: 0,
            normal: 1,
            uv: 2,
            color: 3,
        }
    }
}

impl AttributeSlots {
    /// Rejects tables that map two attributes to the same location.
    pub fn validate(&self) -> Result<()> {
        let slots = [
            ("position", self.position),
            ("normal", self.normal),
            ("uv", self.uv),
            ("color", self.color),
        ];
        for (i, (name, slot)) in slots.iter().enumerate() {
            if let Some((other, _)) = slots[i + 1..].iter().find(|(_, s)| s == slot) {
                return Err(MeshError::Config(format!(
                    "attributes '{name}' and '{other}' share slot {slot}"
                )));
            }
        }
        Ok(())
    }
}

/// Usage hint passed to `glBufferData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
    Stream,
}

impl BufferUsage {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
            BufferUsage::Stream => glow::STREAM_DRAW,
        }
    }
}

/// Per-mesh upload settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    pub slots: AttributeSlots,
    pub usage: BufferUsage,
}

impl MeshConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| MeshError::Config(e.to_string()))?;
        config.slots.validate()?;
        Ok(config)
    }
}

/// Optional blocks the ASE importer reads in addition to positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AseOptions {
    /// Read `*MESH_FACENORMAL` records and give every corner its face normal.
    pub face_normals: bool,
    /// Read the `*MESH_TVERT` / `*MESH_TFACE` lists into texture coordinates.
    pub uvs: bool,
}

/// Settings for the `mesh-viewer` binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub mesh: MeshConfig,
    pub import: AseOptions,
    pub log_level: String,
    pub draw_mode: DrawMode,
    pub plane_size: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mesh: MeshConfig::default(),
            import: AseOptions {
                face_normals: true,
                uvs: false,
            },
            log_level: "info".to_string(),
            draw_mode: DrawMode::Triangles,
            plane_size: 10.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| MeshError::Config(e.to_string()))?;
        config.mesh.slots.validate()?;
        if !(config.plane_size > 0.0) {
            return Err(MeshError::Config(format!(
                "plane_size must be positive, got {}",
                config.plane_size
            )));
        }
        Ok(config)
    }

    pub fn log_level(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| MeshError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}
