//! Avatar model lifecycle: issue the load for the configured reference,
//! watch it settle, and keep the rig showing whatever the load state calls
//! for. The rendered representation is always a pure function of the load
//! state; nothing here mutates a settled state in place.

use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneRoot;
use protocol::AssetReference;
use std::time::Duration;

use super::behavior::BehaviorState;
use super::placeholder::{
    PlaceholderAssets, PlaceholderBody, PlaceholderTint, attach_placeholder_body,
};
use super::types::{AvatarKind, AvatarRig};
use crate::assets::{AssetFailure, AssetLoadState, LoadTransition};
use crate::importer::AvatarImported;

pub const IDLE_CLIP_NAME: &str = "Idle";
pub const BARK_CLIP_NAME: &str = "Bark";

/// What an avatar rig currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    None,
    Placeholder(PlaceholderTint),
    Scene,
}

/// The representation a given load state calls for.
pub fn desired_representation(load: &AssetLoadState<Gltf>) -> Representation {
    match load {
        AssetLoadState::Missing => Representation::Placeholder(PlaceholderTint::Palette),
        AssetLoadState::Pending { .. } => Representation::Placeholder(PlaceholderTint::Loading),
        AssetLoadState::Failed { .. } => Representation::Placeholder(PlaceholderTint::Error),
        AssetLoadState::Ready { .. } => Representation::Scene,
    }
}

/// Per-avatar model state: the configured reference, its load, and the
/// animation graph built from the loaded clips.
#[derive(Component)]
pub struct AvatarModel {
    reference: Option<AssetReference>,
    requested: bool,
    pub load: AssetLoadState<Gltf>,
    graph: Option<Handle<AnimationGraph>>,
    idle_node: Option<AnimationNodeIndex>,
    bark_node: Option<AnimationNodeIndex>,
    shown: Representation,
    shown_entity: Option<Entity>,
}

impl AvatarModel {
    pub fn new(reference: Option<AssetReference>) -> Self {
        Self {
            reference,
            requested: false,
            load: AssetLoadState::Missing,
            graph: None,
            idle_node: None,
            bark_node: None,
            shown: Representation::None,
            shown_entity: None,
        }
    }

    pub fn reference(&self) -> Option<&AssetReference> {
        self.reference.as_ref()
    }

    /// Installs a new reference and restarts the lifecycle. The previous
    /// load's handle is dropped here, so a still-in-flight result has
    /// nowhere left to land.
    pub fn set_reference(&mut self, reference: AssetReference) {
        self.reference = Some(reference);
        self.requested = false;
        self.load = AssetLoadState::Missing;
        self.graph = None;
        self.idle_node = None;
        self.bark_node = None;
    }

    pub fn shown(&self) -> Representation {
        self.shown
    }

    /// The attached scene root, when a loaded model is on display.
    pub fn scene_entity(&self) -> Option<Entity> {
        match self.shown {
            Representation::Scene => self.shown_entity,
            _ => None,
        }
    }
}

/// Issues the asset-server load for avatars whose reference has not been
/// requested yet. A null reference settles as `Missing` without any load.
pub fn request_avatar_models(
    asset_server: Res<AssetServer>,
    mut avatars: Query<(&AvatarKind, &mut AvatarModel)>,
) {
    for (kind, mut avatar) in &mut avatars {
        if avatar.requested {
            continue;
        }
        avatar.requested = true;

        match avatar.reference.clone() {
            Some(reference) => {
                info!("Loading {} avatar model '{}'", kind.tag(), reference);
                avatar.load =
                    AssetLoadState::begin(asset_server.load(reference.as_str().to_string()));
            }
            None => {
                avatar.load = AssetLoadState::Missing;
            }
        }
    }
}

/// Settles pending avatar loads. A Gltf that arrives without any scene is
/// downgraded to a decode failure on the same frame, so observers only ever
/// see `Ready` for playable models.
pub fn poll_avatar_models(
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    mut avatars: Query<(&AvatarKind, &mut AvatarModel)>,
) {
    for (kind, mut avatar) in &mut avatars {
        if !avatar.load.is_pending() {
            continue;
        }
        match avatar.load.poll(&asset_server) {
            Some(LoadTransition::Ready) => {
                let playable = avatar
                    .load
                    .ready_handle()
                    .and_then(|handle| gltfs.get(handle))
                    .is_some_and(|gltf| gltf.default_scene.is_some() || !gltf.scenes.is_empty());
                if playable {
                    info!("{} avatar model ready", kind.tag());
                } else {
                    warn!(
                        "{} avatar model has no scene; treating as decode failure",
                        kind.tag()
                    );
                    avatar.load = AssetLoadState::Failed {
                        failure: AssetFailure::Decode,
                    };
                }
            }
            Some(LoadTransition::Failed(failure)) => {
                warn!("{} avatar model failed to load: {failure}", kind.tag());
            }
            None => {}
        }
    }
}

/// Builds the animation graph once per ready model and records the idle and
/// bark nodes. The clip named "Idle" is preferred; otherwise the first clip
/// stands in. Models without animations simply never get a graph.
pub fn prepare_avatar_animation_graphs(
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut avatars: Query<&mut AvatarModel>,
) {
    for mut avatar in &mut avatars {
        if avatar.graph.is_some() || !avatar.load.is_ready() {
            continue;
        }
        let Some(handle) = avatar.load.ready_handle().cloned() else {
            continue;
        };
        let Some(gltf) = gltfs.get(&handle) else {
            continue;
        };
        if gltf.animations.is_empty() {
            continue;
        }

        let mut graph = AnimationGraph::new();
        let nodes: Vec<AnimationNodeIndex> = graph
            .add_clips(gltf.animations.iter().cloned(), 1.0, graph.root)
            .collect();

        let position_of = |name: &str| {
            gltf.named_animations.get(name).and_then(|named| {
                gltf.animations
                    .iter()
                    .position(|clip| clip.id() == named.id())
            })
        };

        avatar.idle_node = position_of(IDLE_CLIP_NAME)
            .or(Some(0))
            .and_then(|index| nodes.get(index).copied());
        avatar.bark_node =
            position_of(BARK_CLIP_NAME).and_then(|index| nodes.get(index).copied());
        avatar.graph = Some(graphs.add(graph));
    }
}

/// Rebuilds a rig's contents whenever its desired representation changes:
/// palette placeholder for `Missing`, tinted placeholder while `Pending` or
/// `Failed`, the loaded scene once `Ready`.
pub fn sync_avatar_representation(
    mut commands: Commands,
    gltfs: Res<Assets<Gltf>>,
    mut cache: ResMut<PlaceholderAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut avatars: Query<(Entity, &AvatarKind, &mut AvatarModel)>,
    rigs: Query<(Entity, &ChildOf), With<AvatarRig>>,
) {
    for (root, kind, mut avatar) in &mut avatars {
        let desired = desired_representation(&avatar.load);
        if desired == avatar.shown {
            continue;
        }

        let Some(rig) = rigs
            .iter()
            .find(|(_, child_of)| child_of.parent() == root)
            .map(|(entity, _)| entity)
        else {
            continue;
        };

        if let Some(previous) = avatar.shown_entity.take() {
            commands.entity(previous).despawn();
        }
        commands.entity(rig).remove::<PlaceholderBody>();

        match desired {
            Representation::Placeholder(tint) => {
                let body = attach_placeholder_body(
                    &mut commands,
                    rig,
                    &mut cache,
                    &mut meshes,
                    &mut materials,
                    *kind,
                    tint,
                );
                avatar.shown_entity = Some(body);
            }
            Representation::Scene => {
                let scene = avatar
                    .load
                    .ready_handle()
                    .and_then(|handle| gltfs.get(handle))
                    .and_then(|gltf| {
                        gltf.default_scene
                            .clone()
                            .or_else(|| gltf.scenes.first().cloned())
                    });
                let Some(scene) = scene else {
                    continue;
                };
                let scene_root = commands
                    .spawn((SceneRoot(scene), Transform::default(), Visibility::default()))
                    .id();
                commands.entity(rig).add_child(scene_root);
                avatar.shown_entity = Some(scene_root);
            }
            Representation::None => {}
        }

        avatar.shown = desired;
    }
}

/// Marks animation players already wired to an avatar's graph.
#[derive(Component)]
pub struct AvatarAnimationBound;

/// Attaches the avatar's animation graph to every player the loaded scene
/// spawned under it and starts the idle clip on repeat.
pub fn bind_avatar_animation_players(
    mut commands: Commands,
    avatars: Query<&AvatarModel>,
    children_query: Query<&Children>,
    mut players: Query<(Entity, &mut AnimationPlayer), Without<AvatarAnimationBound>>,
) {
    for avatar in &avatars {
        let (Some(graph_handle), Some(idle_node)) = (avatar.graph.clone(), avatar.idle_node)
        else {
            continue;
        };
        let Some(scene_root) = avatar.scene_entity() else {
            continue;
        };

        for player_entity in
            find_unbound_players_in_subtree(scene_root, &children_query, &players)
        {
            if let Ok((entity, mut player)) = players.get_mut(player_entity) {
                let mut transitions = AnimationTransitions::new();
                transitions
                    .play(&mut player, idle_node, Duration::ZERO)
                    .repeat();
                commands.entity(entity).insert((
                    AnimationGraphHandle(graph_handle.clone()),
                    transitions,
                    AvatarAnimationBound,
                ));
            }
        }
    }
}

/// Crossfades bound players between the idle and bark clips as the behavior
/// state flips. Models without a bark clip just keep idling.
pub fn apply_behavior_animation(
    changed: Query<(&AvatarModel, &BehaviorState), Changed<BehaviorState>>,
    children_query: Query<&Children>,
    mut players: Query<
        (&mut AnimationPlayer, &mut AnimationTransitions),
        With<AvatarAnimationBound>,
    >,
) {
    for (avatar, state) in &changed {
        let Some(scene_root) = avatar.scene_entity() else {
            continue;
        };
        let node = if state.is_reacting() {
            avatar.bark_node.or(avatar.idle_node)
        } else {
            avatar.idle_node
        };
        let Some(node) = node else {
            continue;
        };

        for player_entity in find_bound_players_in_subtree(scene_root, &children_query, &players) {
            if let Ok((mut player, mut transitions)) = players.get_mut(player_entity) {
                transitions
                    .play(&mut player, node, Duration::from_millis(200))
                    .repeat();
            }
        }
    }
}

/// Points the user avatar at a freshly imported model. Setting the new
/// reference drops the old load's handle, so a stale in-flight result has
/// nowhere to land.
pub fn apply_imported_avatar_references(
    mut imports: MessageReader<AvatarImported>,
    mut avatars: Query<(&AvatarKind, &mut AvatarModel)>,
) {
    for import in imports.read() {
        for (kind, mut avatar) in &mut avatars {
            if matches!(kind, AvatarKind::User) {
                avatar.set_reference(import.reference.clone());
            }
        }
    }
}

fn find_unbound_players_in_subtree(
    root: Entity,
    children_query: &Query<&Children>,
    players: &Query<(Entity, &mut AnimationPlayer), Without<AvatarAnimationBound>>,
) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if players.contains(entity) {
            result.push(entity);
        }
        if let Ok(children) = children_query.get(entity) {
            queue.extend(children.iter());
        }
    }
    result
}

fn find_bound_players_in_subtree(
    root: Entity,
    children_query: &Query<&Children>,
    players: &Query<(&mut AnimationPlayer, &mut AnimationTransitions), With<AvatarAnimationBound>>,
) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if players.contains(entity) {
            result.push(entity);
        }
        if let Ok(children) = children_query.get(entity) {
            queue.extend(children.iter());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representation_is_a_total_function_of_load_state() {
        assert_eq!(
            desired_representation(&AssetLoadState::Missing),
            Representation::Placeholder(PlaceholderTint::Palette)
        );
        assert_eq!(
            desired_representation(&AssetLoadState::Failed {
                failure: AssetFailure::NotFound
            }),
            Representation::Placeholder(PlaceholderTint::Error)
        );
    }

    #[test]
    fn new_reference_resets_the_lifecycle() {
        let mut model = AvatarModel::new(None);
        model.requested = true;

        model.set_reference(AssetReference::new("https://cdn.example.com/avatar.glb"));

        assert!(!model.requested);
        assert!(matches!(model.load, AssetLoadState::Missing));
        assert_eq!(
            model.reference().map(|r| r.as_str()),
            Some("https://cdn.example.com/avatar.glb")
        );
    }
}
