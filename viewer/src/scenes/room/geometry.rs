//! Static room geometry: floor, wall shell and the table-and-chairs corner.
//! Built once per room entry and torn down with the scene.

use bevy::mesh::Mesh3d;
use bevy::pbr::MeshMaterial3d;
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use super::RoomSceneEntity;

const FLOOR_COLOR: Color = Color::srgb(0.545, 0.451, 0.333);
const WALL_COLOR: Color = Color::srgb(0.91, 0.863, 0.769);
const TABLE_TOP_COLOR: Color = Color::srgb(0.396, 0.263, 0.129);
const TABLE_LEG_COLOR: Color = Color::srgb(0.29, 0.29, 0.29);
const CHAIR_WOOD_COLOR: Color = Color::srgb(0.545, 0.271, 0.075);
const CHAIR_LEG_COLOR: Color = Color::srgb(0.396, 0.263, 0.129);

pub fn spawn_room_geometry(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Building room geometry");

    let matte = |base_color: Color| StandardMaterial {
        base_color,
        perceptual_roughness: 0.9,
        ..default()
    };

    commands.spawn((
        RoomSceneEntity,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 10.0))),
        MeshMaterial3d(materials.add(matte(FLOOR_COLOR))),
        Transform::default(),
    ));

    // One box for all four walls plus ceiling, rendered from the inside.
    commands.spawn((
        RoomSceneEntity,
        Mesh3d(meshes.add(Cuboid::new(10.0, 5.0, 10.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            cull_mode: None,
            double_sided: true,
            ..matte(WALL_COLOR)
        })),
        Transform::from_xyz(0.0, 2.5, 0.0),
    ));

    commands.spawn((
        RoomSceneEntity,
        Mesh3d(meshes.add(Cylinder::new(0.8, 0.1))),
        MeshMaterial3d(materials.add(matte(TABLE_TOP_COLOR))),
        Transform::from_xyz(0.0, 0.4, 2.0),
    ));
    let table_leg_mesh = meshes.add(Cylinder::new(0.05, 0.4));
    let table_leg_material = materials.add(matte(TABLE_LEG_COLOR));
    for x in [-0.6_f32, 0.6] {
        for z in [-0.6_f32, 0.6] {
            commands.spawn((
                RoomSceneEntity,
                Mesh3d(table_leg_mesh.clone()),
                MeshMaterial3d(table_leg_material.clone()),
                Transform::from_xyz(x, 0.2, 2.0 + z),
            ));
        }
    }

    let chair = ChairParts {
        seat_mesh: meshes.add(Cuboid::new(0.5, 0.05, 0.5)),
        back_mesh: meshes.add(Cuboid::new(0.5, 0.6, 0.05)),
        leg_mesh: meshes.add(Cylinder::new(0.02, 0.5)),
        wood: materials.add(matte(CHAIR_WOOD_COLOR)),
        leg_wood: materials.add(matte(CHAIR_LEG_COLOR)),
    };
    // Chair fronts point at the table; the local front is +Z.
    spawn_chair(&mut commands, &chair, Vec3::new(0.0, 0.0, 3.2), PI);
    spawn_chair(&mut commands, &chair, Vec3::new(1.2, 0.0, 2.0), -FRAC_PI_2);
    spawn_chair(&mut commands, &chair, Vec3::new(-1.2, 0.0, 2.0), FRAC_PI_2);
}

struct ChairParts {
    seat_mesh: Handle<Mesh>,
    back_mesh: Handle<Mesh>,
    leg_mesh: Handle<Mesh>,
    wood: Handle<StandardMaterial>,
    leg_wood: Handle<StandardMaterial>,
}

fn spawn_chair(commands: &mut Commands, parts: &ChairParts, position: Vec3, yaw: f32) {
    commands
        .spawn((
            RoomSceneEntity,
            Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(parts.seat_mesh.clone()),
                MeshMaterial3d(parts.wood.clone()),
                Transform::from_xyz(0.0, 0.5, 0.0),
            ));
            parent.spawn((
                Mesh3d(parts.back_mesh.clone()),
                MeshMaterial3d(parts.wood.clone()),
                Transform::from_xyz(0.0, 0.8, -0.22),
            ));
            for x in [-0.2_f32, 0.2] {
                for z in [-0.2_f32, 0.2] {
                    parent.spawn((
                        Mesh3d(parts.leg_mesh.clone()),
                        MeshMaterial3d(parts.leg_wood.clone()),
                        Transform::from_xyz(x, 0.25, z),
                    ));
                }
            }
        });
}
