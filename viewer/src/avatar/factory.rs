//! Assembly of avatar entities: a root carrying kind, model lifecycle, and
//! behavior state, with a rig child that the motion systems animate.

use bevy::prelude::*;
use protocol::AssetReference;

use super::behavior::{BehaviorState, ReactionSchedule};
use super::model::AvatarModel;
use super::types::{AvatarKind, AvatarRig};

/// Spawns an avatar at `position`, returning the root entity. The root holds
/// the stationary transform; the rig child under it carries the idle motion
/// offsets and whatever body the model lifecycle attaches.
pub fn spawn_avatar(
    commands: &mut Commands,
    kind: AvatarKind,
    position: Vec3,
    reference: Option<AssetReference>,
) -> Entity {
    let rig = commands
        .spawn((AvatarRig, Transform::default(), Visibility::default()))
        .id();

    let mut root = commands.spawn((
        kind,
        AvatarModel::new(reference),
        BehaviorState::default(),
        Transform::from_translation(position).with_scale(Vec3::splat(kind.model_scale())),
        Visibility::default(),
    ));
    root.add_child(rig);
    if matches!(kind, AvatarKind::Companion) {
        root.insert(ReactionSchedule::armed());
    }
    root.id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_companion_carries_a_reaction_schedule() {
        let mut app = App::new();
        let (user, companion) = {
            let mut commands = app.world_mut().commands();
            let user = spawn_avatar(&mut commands, AvatarKind::User, Vec3::new(-1.5, 0.0, 0.0), None);
            let companion = spawn_avatar(
                &mut commands,
                AvatarKind::Companion,
                Vec3::new(1.5, 0.0, 0.0),
                Some(AssetReference::new("models/bruno-shih-tzu.glb")),
            );
            (user, companion)
        };
        app.world_mut().flush();

        let world = app.world();
        assert!(world.get::<ReactionSchedule>(companion).is_some());
        assert!(world.get::<ReactionSchedule>(user).is_none());
        assert_eq!(
            world.get::<Transform>(companion).map(|t| t.translation),
            Some(Vec3::new(1.5, 0.0, 0.0))
        );
    }

    #[test]
    fn each_avatar_root_has_a_rig_child() {
        let mut app = App::new();
        let root = {
            let mut commands = app.world_mut().commands();
            spawn_avatar(&mut commands, AvatarKind::User, Vec3::ZERO, None)
        };
        app.world_mut().flush();

        let world = app.world_mut();
        let mut rigs = world.query_filtered::<(Entity, &ChildOf), With<AvatarRig>>();
        let attached = rigs
            .iter(world)
            .any(|(_, child_of)| child_of.parent() == root);
        assert!(attached);
    }
}
