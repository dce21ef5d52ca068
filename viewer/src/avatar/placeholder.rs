//! Procedural placeholder bodies. Whenever a model reference is absent or
//! its load has not produced a usable scene, the rig shows one of these
//! deterministic silhouettes instead; mesh and material handles are cached
//! so repeated builds share assets.

use bevy::mesh::Mesh3d;
use bevy::pbr::MeshMaterial3d;
use bevy::prelude::*;
use std::collections::HashMap;

use super::behavior::{CompanionTail, TAIL_BASE_PITCH};
use super::types::AvatarKind;

/// Translucent gray shown while a model load is still pending.
pub const LOADING_TINT: Color = Color::srgba(0.8, 0.8, 0.8, 0.5);
/// Opaque coral shown when a model load has failed.
pub const ERROR_TINT: Color = Color::srgb(1.0, 0.42, 0.42);
/// Neutral photo surface used while a frame texture is unavailable.
pub const PHOTO_SURFACE_NEUTRAL: Color = Color::srgb(0.941, 0.941, 0.941);

const COMPANION_BODY_COLOR: Color = Color::srgb(0.824, 0.706, 0.549);
const COMPANION_HEAD_COLOR: Color = Color::srgb(0.961, 0.871, 0.702);
const COMPANION_TRIM_COLOR: Color = Color::srgb(0.545, 0.271, 0.075);
const USER_SKIN_COLOR: Color = Color::srgb(1.0, 0.859, 0.675);
const USER_TORSO_COLOR: Color = Color::srgb(0.255, 0.412, 0.882);
const USER_LEG_COLOR: Color = Color::srgb(0.184, 0.31, 0.31);
const FRAME_CHROME_COLOR: Color = Color::srgb(0.545, 0.271, 0.075);

/// Present on an avatar rig while it shows procedural placeholder parts.
#[derive(Component)]
pub struct PlaceholderBody;

/// How a placeholder body is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderTint {
    /// The silhouette's own palette.
    Palette,
    /// Uniform translucent gray while the real model is pending.
    Loading,
    /// Uniform error coral after a failed load.
    Error,
}

impl PlaceholderTint {
    fn override_color(self) -> Option<Color> {
        match self {
            Self::Palette => None,
            Self::Loading => Some(LOADING_TINT),
            Self::Error => Some(ERROR_TINT),
        }
    }
}

/// Every distinct mesh a placeholder build can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartShape {
    CompanionBody,
    CompanionHead,
    CompanionEar,
    CompanionLeg,
    CompanionTail,
    EyeBead,
    NoseBead,
    UserHead,
    UserTorso,
    UserArm,
    UserLeg,
    FrameChrome,
    PhotoSurface,
}

impl PartShape {
    fn mesh(self) -> Mesh {
        match self {
            Self::CompanionBody => Cuboid::new(1.2, 0.6, 0.8).into(),
            Self::CompanionHead => Cuboid::new(0.6, 0.5, 0.7).into(),
            Self::CompanionEar => Cuboid::new(0.2, 0.4, 0.1).into(),
            Self::CompanionLeg => Cylinder::new(0.08, 0.6).into(),
            Self::CompanionTail => Cylinder::new(0.05, 0.4).into(),
            Self::EyeBead => Sphere::new(0.05).into(),
            Self::NoseBead => Sphere::new(0.03).into(),
            Self::UserHead => Sphere::new(0.25).into(),
            Self::UserTorso => ConicalFrustum {
                radius_top: 0.3,
                radius_bottom: 0.25,
                height: 0.8,
            }
            .into(),
            Self::UserArm => Cylinder::new(0.08, 0.6).into(),
            Self::UserLeg => Cylinder::new(0.1, 0.6).into(),
            Self::FrameChrome => Cuboid::new(1.2, 1.2, 0.05).into(),
            Self::PhotoSurface => Rectangle::new(1.0, 1.0).into(),
        }
    }
}

/// Shared handle cache for everything the placeholder factory hands out.
#[derive(Resource, Default)]
pub struct PlaceholderAssets {
    meshes: HashMap<PartShape, Handle<Mesh>>,
    materials: HashMap<[u8; 4], Handle<StandardMaterial>>,
}

impl PlaceholderAssets {
    pub fn mesh(&mut self, meshes: &mut Assets<Mesh>, shape: PartShape) -> Handle<Mesh> {
        self.meshes
            .entry(shape)
            .or_insert_with(|| meshes.add(shape.mesh()))
            .clone()
    }

    pub fn material(
        &mut self,
        materials: &mut Assets<StandardMaterial>,
        color: Color,
    ) -> Handle<StandardMaterial> {
        let key = color.to_srgba().to_u8_array();
        self.materials
            .entry(key)
            .or_insert_with(|| {
                let translucent = key[3] < u8::MAX;
                materials.add(StandardMaterial {
                    base_color: color,
                    perceptual_roughness: 0.9,
                    alpha_mode: if translucent {
                        AlphaMode::Blend
                    } else {
                        AlphaMode::Opaque
                    },
                    ..default()
                })
            })
            .clone()
    }
}

/// Builds the placeholder silhouette for `kind` under `rig` and marks the
/// rig as placeholder-driven. Returns the body root so the caller can tear
/// it down later.
pub fn attach_placeholder_body(
    commands: &mut Commands,
    rig: Entity,
    cache: &mut PlaceholderAssets,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    kind: AvatarKind,
    tint: PlaceholderTint,
) -> Entity {
    let body = match kind {
        AvatarKind::User => spawn_user_silhouette(commands, cache, meshes, materials, tint),
        AvatarKind::Companion => {
            spawn_companion_silhouette(commands, cache, meshes, materials, tint)
        }
    };

    commands.entity(rig).add_child(body).insert(PlaceholderBody);
    body
}

fn spawn_user_silhouette(
    commands: &mut Commands,
    cache: &mut PlaceholderAssets,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tint: PlaceholderTint,
) -> Entity {
    let paint = |color: Color| tint.override_color().unwrap_or(color);

    let head_mesh = cache.mesh(meshes, PartShape::UserHead);
    let torso_mesh = cache.mesh(meshes, PartShape::UserTorso);
    let arm_mesh = cache.mesh(meshes, PartShape::UserArm);
    let leg_mesh = cache.mesh(meshes, PartShape::UserLeg);
    let skin = cache.material(materials, paint(USER_SKIN_COLOR));
    let torso = cache.material(materials, paint(USER_TORSO_COLOR));
    let legs = cache.material(materials, paint(USER_LEG_COLOR));

    commands
        .spawn((Transform::default(), Visibility::default()))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(head_mesh),
                MeshMaterial3d(skin.clone()),
                Transform::from_xyz(0.0, 1.7, 0.0),
            ));
            parent.spawn((
                Mesh3d(torso_mesh),
                MeshMaterial3d(torso),
                Transform::from_xyz(0.0, 1.0, 0.0),
            ));
            for side in [-1.0_f32, 1.0] {
                parent.spawn((
                    Mesh3d(arm_mesh.clone()),
                    MeshMaterial3d(skin.clone()),
                    Transform::from_xyz(side * 0.4, 1.2, 0.0)
                        .with_rotation(Quat::from_rotation_z(-side * std::f32::consts::FRAC_PI_6)),
                ));
                parent.spawn((
                    Mesh3d(leg_mesh.clone()),
                    MeshMaterial3d(legs.clone()),
                    Transform::from_xyz(side * 0.15, 0.3, 0.0),
                ));
            }
        })
        .id()
}

fn spawn_companion_silhouette(
    commands: &mut Commands,
    cache: &mut PlaceholderAssets,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tint: PlaceholderTint,
) -> Entity {
    let paint = |color: Color| tint.override_color().unwrap_or(color);

    let body_mesh = cache.mesh(meshes, PartShape::CompanionBody);
    let head_mesh = cache.mesh(meshes, PartShape::CompanionHead);
    let ear_mesh = cache.mesh(meshes, PartShape::CompanionEar);
    let leg_mesh = cache.mesh(meshes, PartShape::CompanionLeg);
    let tail_mesh = cache.mesh(meshes, PartShape::CompanionTail);
    let eye_mesh = cache.mesh(meshes, PartShape::EyeBead);
    let nose_mesh = cache.mesh(meshes, PartShape::NoseBead);
    let body_color = cache.material(materials, paint(COMPANION_BODY_COLOR));
    let head_color = cache.material(materials, paint(COMPANION_HEAD_COLOR));
    let trim = cache.material(materials, paint(COMPANION_TRIM_COLOR));
    let bead = cache.material(materials, paint(Color::BLACK));

    commands
        .spawn((Transform::default(), Visibility::default()))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(body_mesh),
                MeshMaterial3d(body_color),
                Transform::from_xyz(0.0, 0.3, 0.0),
            ));
            parent.spawn((
                Mesh3d(head_mesh),
                MeshMaterial3d(head_color),
                Transform::from_xyz(0.0, 0.7, 0.5),
            ));
            for side in [-1.0_f32, 1.0] {
                parent.spawn((
                    Mesh3d(ear_mesh.clone()),
                    MeshMaterial3d(trim.clone()),
                    Transform::from_xyz(side * 0.2, 0.9, 0.3)
                        .with_rotation(Quat::from_rotation_z(side * 0.3)),
                ));
                parent.spawn((
                    Mesh3d(eye_mesh.clone()),
                    MeshMaterial3d(bead.clone()),
                    Transform::from_xyz(side * 0.15, 0.8, 0.8),
                ));
            }
            for x in [-0.4_f32, 0.4] {
                for z in [-0.2_f32, 0.2] {
                    parent.spawn((
                        Mesh3d(leg_mesh.clone()),
                        MeshMaterial3d(trim.clone()),
                        Transform::from_xyz(x, 0.0, z),
                    ));
                }
            }
            parent.spawn((
                CompanionTail,
                Mesh3d(tail_mesh),
                MeshMaterial3d(trim.clone()),
                Transform::from_xyz(0.0, 0.5, -0.6)
                    .with_rotation(Quat::from_rotation_x(TAIL_BASE_PITCH)),
            ));
            parent.spawn((
                Mesh3d(nose_mesh),
                MeshMaterial3d(bead),
                Transform::from_xyz(0.0, 0.7, 0.9),
            ));
        })
        .id()
}

/// Frame chrome material shared by every photo frame.
pub fn frame_chrome_material(
    cache: &mut PlaceholderAssets,
    materials: &mut Assets<StandardMaterial>,
) -> Handle<StandardMaterial> {
    cache.material(materials, FRAME_CHROME_COLOR)
}

/// Neutral surface shown while a photo texture is pending, failed or absent.
pub fn photo_surface_placeholder_material(
    cache: &mut PlaceholderAssets,
    materials: &mut Assets<StandardMaterial>,
) -> Handle<StandardMaterial> {
    cache.material(materials, PHOTO_SURFACE_NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_handles_are_stable_across_builds() {
        let mut cache = PlaceholderAssets::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let first = cache.mesh(&mut meshes, PartShape::CompanionBody);
        let second = cache.mesh(&mut meshes, PartShape::CompanionBody);
        assert_eq!(first, second);
        assert_eq!(meshes.len(), 1);

        let tan = cache.material(&mut materials, COMPANION_BODY_COLOR);
        let tan_again = cache.material(&mut materials, COMPANION_BODY_COLOR);
        let coral = cache.material(&mut materials, ERROR_TINT);
        assert_eq!(tan, tan_again);
        assert_ne!(tan, coral);
        assert_eq!(materials.len(), 2);
    }

    #[test]
    fn loading_tint_material_blends() {
        let mut cache = PlaceholderAssets::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let handle = cache.material(&mut materials, LOADING_TINT);
        let material = materials.get(&handle).unwrap();
        assert_eq!(material.alpha_mode, AlphaMode::Blend);

        let opaque = cache.material(&mut materials, ERROR_TINT);
        assert_eq!(materials.get(&opaque).unwrap().alpha_mode, AlphaMode::Opaque);
    }

    #[test]
    fn tint_overrides_drop_the_palette() {
        assert_eq!(PlaceholderTint::Palette.override_color(), None);
        assert_eq!(
            PlaceholderTint::Loading.override_color(),
            Some(LOADING_TINT)
        );
        assert_eq!(PlaceholderTint::Error.override_color(), Some(ERROR_TINT));
    }
}
