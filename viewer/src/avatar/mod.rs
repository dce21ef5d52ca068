pub mod behavior;
pub mod factory;
pub mod model;
pub mod placeholder;
pub mod types;

pub use behavior::{
    BehaviorState, ReactionSchedule, advance_reaction_schedules, drive_avatar_motion,
    lift_companion_tail,
};
pub use factory::spawn_avatar;
pub use model::{
    AvatarModel, Representation, apply_behavior_animation, apply_imported_avatar_references,
    bind_avatar_animation_players, desired_representation, poll_avatar_models,
    prepare_avatar_animation_graphs, request_avatar_models, sync_avatar_representation,
};
pub use placeholder::{PlaceholderAssets, PlaceholderBody, PlaceholderTint};
pub use types::{AvatarKind, AvatarRig, SessionIdentity, avatar_label};
