//! Frame-driven avatar motion. All waveforms are pure functions of elapsed
//! time so they can be unit tested without an app; per-frame systems apply
//! them to the avatar rigs. The companion's scripted bark sequence lives
//! here too, as timers on the entity itself.

use bevy::prelude::*;
use std::time::Duration;

use super::placeholder::PlaceholderBody;
use super::types::{AvatarKind, AvatarRig};

pub const BREATHING_AMPLITUDE: f32 = 0.02;
pub const BREATHING_FREQUENCY: f32 = 1.5;

pub const SWAY_AMPLITUDE: f32 = 0.2;
pub const SWAY_IDLE_FREQUENCY: f32 = 4.0;
pub const SWAY_REACTING_FREQUENCY: f32 = 8.0;

pub const BOUNCE_AMPLITUDE: f32 = 0.05;
pub const BOUNCE_FREQUENCY: f32 = 2.0;

pub const TAIL_BASE_PITCH: f32 = 0.3;
pub const TAIL_REACTING_LIFT: f32 = 0.5;

pub const FIRST_REACTION_DELAY_SECS: f32 = 2.0;
pub const NEXT_REACTION_DELAY_SECS: f32 = 5.0;
pub const REACTION_HOLD_SECS: f32 = 1.0;
pub const MAX_REACTIONS: u8 = 2;

/// Vertical idle-breathing offset, shared by both avatar variants.
pub fn breathing_offset(t: f32) -> f32 {
    BREATHING_AMPLITUDE * (t * BREATHING_FREQUENCY).sin()
}

/// Companion yaw sway; twice as fast while reacting.
pub fn sway_angle(t: f32, reacting: bool) -> f32 {
    let frequency = if reacting {
        SWAY_REACTING_FREQUENCY
    } else {
        SWAY_IDLE_FREQUENCY
    };
    SWAY_AMPLITUDE * (t * frequency).sin()
}

/// Extra vertical bounce for procedural placeholder bodies.
pub fn bounce_offset(t: f32) -> f32 {
    BOUNCE_AMPLITUDE * (t * BOUNCE_FREQUENCY).sin()
}

pub fn tail_pitch(reacting: bool) -> f32 {
    if reacting {
        TAIL_BASE_PITCH + TAIL_REACTING_LIFT
    } else {
        TAIL_BASE_PITCH
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorState {
    #[default]
    Idle,
    Reacting,
}

impl BehaviorState {
    pub fn is_reacting(self) -> bool {
        matches!(self, Self::Reacting)
    }
}

/// The companion's scripted bark timeline. Timers are entity state, so a
/// despawn cancels everything outstanding. The delay to the next reaction
/// runs from the moment the previous one fires: the first at 2 s, one more
/// 5 s later, then never again.
#[derive(Component)]
pub struct ReactionSchedule {
    next_reaction: Option<Timer>,
    hold: Option<Timer>,
    fired: u8,
}

impl ReactionSchedule {
    pub fn armed() -> Self {
        Self {
            next_reaction: Some(Timer::from_seconds(
                FIRST_REACTION_DELAY_SECS,
                TimerMode::Once,
            )),
            hold: None,
            fired: 0,
        }
    }

    pub fn reactions_fired(&self) -> u8 {
        self.fired
    }

    /// True once the cap is reached and the final hold has elapsed.
    pub fn is_exhausted(&self) -> bool {
        self.fired >= MAX_REACTIONS && self.next_reaction.is_none() && self.hold.is_none()
    }

    /// Ticks both timers and reports the behavior-state change this step
    /// produced, if any. A reaction firing wins over a hold expiring in the
    /// same step.
    pub fn advance(&mut self, delta: Duration) -> Option<BehaviorState> {
        let mut change = None;

        if let Some(hold) = self.hold.as_mut() {
            if hold.tick(delta).just_finished() {
                self.hold = None;
                change = Some(BehaviorState::Idle);
            }
        }

        if let Some(next) = self.next_reaction.as_mut() {
            if next.tick(delta).just_finished() {
                self.next_reaction = None;
                self.fired += 1;
                self.hold = Some(Timer::from_seconds(REACTION_HOLD_SECS, TimerMode::Once));
                if self.fired < MAX_REACTIONS {
                    self.next_reaction = Some(Timer::from_seconds(
                        NEXT_REACTION_DELAY_SECS,
                        TimerMode::Once,
                    ));
                }
                change = Some(BehaviorState::Reacting);
            }
        }

        change
    }
}

pub fn advance_reaction_schedules(
    time: Res<Time>,
    mut avatars: Query<(&mut ReactionSchedule, &mut BehaviorState)>,
) {
    for (mut schedule, mut state) in &mut avatars {
        if let Some(next) = schedule.advance(time.delta()) {
            *state = next;
        }
    }
}

/// Applies the idle waveforms to every avatar rig. The rig's transform is
/// rewritten wholesale each frame, so hover/scale state never leaks in.
pub fn drive_avatar_motion(
    time: Res<Time>,
    avatars: Query<(&AvatarKind, &BehaviorState)>,
    mut rigs: Query<(&ChildOf, Option<&PlaceholderBody>, &mut Transform), With<AvatarRig>>,
) {
    let t = time.elapsed_secs();

    for (child_of, placeholder, mut transform) in &mut rigs {
        let Ok((kind, state)) = avatars.get(child_of.parent()) else {
            continue;
        };

        match kind {
            AvatarKind::User => {
                transform.translation.y = breathing_offset(t);
            }
            AvatarKind::Companion => {
                let mut offset = breathing_offset(t);
                if placeholder.is_some() {
                    offset += bounce_offset(t);
                }
                transform.translation.y = offset;
                transform.rotation = Quat::from_rotation_y(sway_angle(t, state.is_reacting()));
            }
        }
    }
}

/// Lifts the placeholder companion's tail while it reacts.
pub fn lift_companion_tail(
    mut tails: Query<(&ChildOf, &mut Transform), With<CompanionTail>>,
    rigs: Query<&ChildOf, With<AvatarRig>>,
    avatars: Query<&BehaviorState>,
) {
    for (child_of, mut transform) in &mut tails {
        let Ok(rig_parent) = rigs.get(child_of.parent()) else {
            continue;
        };
        let Ok(state) = avatars.get(rig_parent.parent()) else {
            continue;
        };
        transform.rotation = Quat::from_rotation_x(tail_pitch(state.is_reacting()));
    }
}

/// Marks the tail part of a placeholder companion body.
#[derive(Component)]
pub struct CompanionTail;
