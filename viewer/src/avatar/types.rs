use bevy::prelude::*;

/// Environment override for the user's display label.
pub const SESSION_LABEL_ENV: &str = "MEMORY_ROOM_LABEL";

pub const COMPANION_DISPLAY_NAME: &str = "Bruno";
pub const USER_FALLBACK_LABEL: &str = "You";
pub const COMPANION_REACTING_SUFFIX: &str = "(Woof!)";
pub const COMPANION_IDLE_SUFFIX: &str = "(Happy)";

/// Which of the two inhabitants an avatar entity is.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarKind {
    User,
    Companion,
}

impl AvatarKind {
    pub const ALL: [Self; 2] = [Self::User, Self::Companion];

    pub fn tag(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Companion => "companion",
        }
    }

    /// Scale applied to a loaded model scene under this avatar's rig.
    pub fn model_scale(self) -> f32 {
        match self {
            Self::User => 1.0,
            Self::Companion => 0.5,
        }
    }

    /// Height above the avatar root at which the HUD label floats.
    pub fn label_height(self) -> f32 {
        match self {
            Self::User => 2.2,
            Self::Companion => 0.75,
        }
    }
}

/// Child of every avatar root that carries the frame-driven motion offsets.
/// The root keeps the composed world position; only the rig moves.
#[derive(Component)]
pub struct AvatarRig;

/// Optional display identity for the person in the room.
#[derive(Resource, Debug, Default, Clone)]
pub struct SessionIdentity {
    pub display_label: Option<String>,
}

impl SessionIdentity {
    pub fn from_env() -> Self {
        let display_label = std::env::var(SESSION_LABEL_ENV)
            .ok()
            .filter(|label| !label.trim().is_empty());
        Self { display_label }
    }
}

/// Text shown on the floating label above an avatar.
pub fn avatar_label(kind: AvatarKind, identity: &SessionIdentity, reacting: bool) -> String {
    match kind {
        AvatarKind::User => identity
            .display_label
            .clone()
            .unwrap_or_else(|| USER_FALLBACK_LABEL.to_string()),
        AvatarKind::Companion => {
            let suffix = if reacting {
                COMPANION_REACTING_SUFFIX
            } else {
                COMPANION_IDLE_SUFFIX
            };
            format!("{COMPANION_DISPLAY_NAME} {suffix}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_label_falls_back_when_identity_is_anonymous() {
        let identity = SessionIdentity::default();
        assert_eq!(avatar_label(AvatarKind::User, &identity, false), "You");

        let named = SessionIdentity {
            display_label: Some("Alex".to_string()),
        };
        assert_eq!(avatar_label(AvatarKind::User, &named, false), "Alex");
    }

    #[test]
    fn companion_label_tracks_behavior() {
        let identity = SessionIdentity::default();
        assert_eq!(
            avatar_label(AvatarKind::Companion, &identity, false),
            "Bruno (Happy)"
        );
        assert_eq!(
            avatar_label(AvatarKind::Companion, &identity, true),
            "Bruno (Woof!)"
        );
    }
}
