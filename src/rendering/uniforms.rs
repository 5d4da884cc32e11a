//! GPU-side layouts of the shading state and their packing from the scene.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::lighting::{AreaLightGeometry, ReferenceProjectionQuad};
use crate::mesh::MeshBuffer;
use crate::scene::SceneState;
use crate::waves::WaveField;

/// One surface patch corner (padded to vec4 for storage-buffer layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PatchVertex {
    pub position: [f32; 4],
    pub uv: [f32; 4],
}

/// One wave as the surface shader reads it
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuWave {
    /// xy = unit direction in the XZ plane
    pub direction: [f32; 4],
    /// x = amplitude, y = frequency, z = speed
    pub params: [f32; 4],
}

/// Surface shading state, pushed to every surface program each frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// xyz = camera position, w = simulation time
    pub camera_time: [f32; 4],
    /// xyz = directional key light travel direction, w = shininess
    pub light_dir_shininess: [f32; 4],
    /// rgb = key light colour, w = intensity
    pub light_color_intensity: [f32; 4],
    /// xyz = positional key light, w = ambient
    pub light_position_ambient: [f32; 4],
    /// rgb = area light colour, w = area intensity
    pub area_color_intensity: [f32; 4],
    /// tessellation level, wave count, light panel count, key light kind
    pub counts: [u32; 4],
    /// inner radius, outer radius, roughness, unused
    pub lod_roughness: [f32; 4],
    pub reference_positions: [[f32; 4]; 4],
    pub reference_uvs: [[f32; 4]; 4],
}

/// Emissive light panel pass
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightQuadUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// rgb = area light colour, w = intensity
    pub color_intensity: [f32; 4],
    /// x = 1 when the panel texture is shown
    pub flags: [u32; 4],
}

/// Sky pass: inverse of projection times rotation-only view
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
}

/// Split flat triangle corners into patch vertices, three per patch
pub fn patch_vertices(mesh: &MeshBuffer) -> Vec<PatchVertex> {
    mesh.vertices
        .iter()
        .map(|v| PatchVertex {
            position: [v.position[0], v.position[1], v.position[2], 1.0],
            uv: [v.uv[0], v.uv[1], 0.0, 0.0],
        })
        .collect()
}

pub fn gpu_waves(field: &WaveField) -> Vec<GpuWave> {
    field
        .waves()
        .iter()
        .map(|w| GpuWave {
            direction: [w.direction.x, w.direction.y, 0.0, 0.0],
            params: [w.amplitude, w.frequency, w.speed, 0.0],
        })
        .collect()
}

/// Wave buffer contents. Storage bindings cannot be empty, so a flat field
/// gets one zeroed wave that the wave count in the uniforms leaves unread.
pub fn wave_storage(field: &WaveField) -> Vec<GpuWave> {
    let mut waves = gpu_waves(field);
    if waves.is_empty() {
        waves.push(GpuWave::zeroed());
    }
    waves
}

/// Canonical corners, four per panel, padded to vec4
pub fn light_corners(geometry: &AreaLightGeometry) -> Vec<[f32; 4]> {
    geometry
        .corner_positions()
        .into_iter()
        .map(|p| p.extend(1.0).to_array())
        .collect()
}

fn reference_arrays(reference: Option<&ReferenceProjectionQuad>) -> ([[f32; 4]; 4], [[f32; 4]; 4]) {
    match reference {
        Some(quad) => (
            quad.positions().map(|p| p.extend(1.0).to_array()),
            quad.uvs().map(|uv| [uv.x, uv.y, 0.0, 0.0]),
        ),
        None => ([[0.0; 4]; 4], [[0.0; 4]; 4]),
    }
}

impl SurfaceUniforms {
    /// Pack the current scene for the surface programs
    pub fn from_scene(scene: &SceneState, view_proj: Mat4, time_s: f32, gpu_level: u32) -> Self {
        let lod = scene.lod.state();
        let lighting = &scene.lighting;
        let camera = scene.camera.position;
        let key_dir = Vec3::from_array(lighting.key_direction).normalize_or_zero();
        let (reference_positions, reference_uvs) =
            reference_arrays(scene.lights.as_ref().map(|rig| rig.geometry.reference()));

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            camera_time: [camera.x, camera.y, camera.z, time_s],
            light_dir_shininess: [key_dir.x, key_dir.y, key_dir.z, lighting.shininess],
            light_color_intensity: [
                lighting.key_color[0],
                lighting.key_color[1],
                lighting.key_color[2],
                lighting.intensity,
            ],
            light_position_ambient: [
                lighting.key_position[0],
                lighting.key_position[1],
                lighting.key_position[2],
                lighting.ambient,
            ],
            area_color_intensity: [
                lighting.area_color[0],
                lighting.area_color[1],
                lighting.area_color[2],
                lighting.area_intensity,
            ],
            counts: [
                gpu_level.max(1),
                scene.waves.len() as u32,
                scene.light_panel_count() as u32,
                scene.shading.key_light.shader_code(),
            ],
            lod_roughness: [lod.inner_radius, lod.outer_radius, lighting.roughness, 0.0],
            reference_positions,
            reference_uvs,
        }
    }
}

impl SkyboxUniforms {
    /// Drop the view translation so the sky stays at infinity
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        let rotation = Mat4::from_mat3(Mat3::from_mat4(view));
        Self {
            inv_view_proj: (projection * rotation).inverse().to_cols_array_2d(),
        }
    }
}
