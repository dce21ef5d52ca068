//! The egui overlay: loading screen, bottom action bar, the avatar editor
//! dialog, photo details and the name chips floating over the 3D room.
//! Whatever the overlay owns the pointer for is reported through
//! [`UiPointerCapture`] so world picking stays quiet behind dialogs.

use crate::AppState;
use crate::assets::{PhotoLibraryState, PhotoRecord};
use crate::avatar::{AvatarKind, BehaviorState, SessionIdentity, avatar_label};
use crate::gallery::{FrameHover, GalleryStatus, PhotoFrame, PhotoSelected, frame};
use crate::importer::{
    CancelImportSession, EditorPayloadReceived, ImportSession, OpenImportSession,
};
use crate::scenes::room::camera::RoomCamera;
use crate::settings::{
    self, FpsLimitSetting, ResolutionSetting, SettingsResource, ViewerSettings, WindowModeSetting,
};
use bevy::prelude::*;
use bevy::state::prelude::OnEnter;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

/// Whether the egui overlay currently owns the pointer. Written at the end
/// of every HUD pass; world-side picking and camera input read it on the
/// next frame.
#[derive(Resource, Default)]
pub struct UiPointerCapture {
    pub captured: bool,
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudUiState>()
            .init_resource::<UiPointerCapture>()
            .add_systems(OnEnter(AppState::Room), reset_room_hud_state)
            .add_systems(
                Update,
                close_topmost_surface_with_escape.run_if(room_hud_active),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    draw_hud_egui,
                    draw_room_labels.run_if(room_hud_active),
                    sync_pointer_capture,
                )
                    .chain(),
            );
    }
}

fn room_hud_active(state: Res<State<AppState>>) -> bool {
    matches!(state.get(), AppState::Room)
}

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum SettingsTab {
    #[default]
    Graphics,
    Camera,
}

#[derive(Resource)]
struct HudUiState {
    settings_open: bool,
    settings_tab: SettingsTab,
    draft: ViewerSettings,
    editor_payload: String,
    selected_photo: Option<PhotoRecord>,
}

impl Default for HudUiState {
    fn default() -> Self {
        Self {
            settings_open: false,
            settings_tab: SettingsTab::Graphics,
            draft: ViewerSettings::default(),
            editor_payload: String::new(),
            selected_photo: None,
        }
    }
}

fn reset_room_hud_state(mut hud_state: ResMut<HudUiState>, settings: Res<SettingsResource>) {
    hud_state.settings_open = false;
    hud_state.settings_tab = SettingsTab::Graphics;
    hud_state.draft = settings.current.clone();
    hud_state.editor_payload.clear();
    hud_state.selected_photo = None;
}

/// Escape closes whichever surface is on top: the editor dialog first, then
/// the photo details, and otherwise toggles the settings modal.
fn close_topmost_surface_with_escape(
    keys: Res<ButtonInput<KeyCode>>,
    settings_resource: Res<SettingsResource>,
    import_session: Res<ImportSession>,
    mut hud_state: ResMut<HudUiState>,
    mut cancel_requests: MessageWriter<CancelImportSession>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }

    if import_session.is_open() {
        cancel_requests.write(CancelImportSession);
        return;
    }

    if hud_state.selected_photo.is_some() {
        hud_state.selected_photo = None;
        return;
    }

    if !hud_state.settings_open {
        hud_state.draft = settings_resource.current.clone();
        hud_state.settings_tab = SettingsTab::Graphics;
    }
    hud_state.settings_open = !hud_state.settings_open;
}

fn draw_hud_egui(
    mut contexts: EguiContexts,
    mut hud_state: ResMut<HudUiState>,
    mut settings_resource: ResMut<SettingsResource>,
    import_session: Res<ImportSession>,
    gallery_status: Res<GalleryStatus>,
    library_state: Res<PhotoLibraryState>,
    app_state: Res<State<AppState>>,
    mut open_requests: MessageWriter<OpenImportSession>,
    mut cancel_requests: MessageWriter<CancelImportSession>,
    mut payloads: MessageWriter<EditorPayloadReceived>,
    mut selections: MessageReader<PhotoSelected>,
    mut theme_initialized: Local<bool>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if !*theme_initialized {
        apply_hud_theme(ctx);
        *theme_initialized = true;
    }

    for selection in selections.read() {
        hud_state.selected_photo = Some(selection.record.clone());
    }

    if matches!(app_state.get(), AppState::Loading) {
        draw_loading_overlay(ctx);
        return;
    }

    draw_bottom_bar(
        &mut hud_state,
        &settings_resource,
        &import_session,
        ctx,
        &mut open_requests,
    );

    if import_session.is_open() {
        draw_import_dialog(
            &mut hud_state,
            &import_session,
            ctx,
            &mut cancel_requests,
            &mut payloads,
        );
    }

    if let Some(record) = hud_state.selected_photo.clone() {
        draw_photo_details(&mut hud_state, &record, ctx);
    }

    if gallery_status.visible == 0 && library_state.is_settled() {
        draw_empty_gallery_hint(ctx);
    }

    if hud_state.settings_open {
        draw_settings_modal(&mut hud_state, &mut settings_resource, ctx);
    }
}

fn apply_hud_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(14);
    style.visuals.window_corner_radius = egui::CornerRadius::same(12);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(10);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(8);
    ctx.set_style(style);
}

fn draw_loading_overlay(ctx: &egui::Context) {
    egui::Window::new("Loading")
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.heading("Loading your memory room...");
            });
        });
}

fn draw_bottom_bar(
    hud_state: &mut HudUiState,
    settings_resource: &SettingsResource,
    import_session: &ImportSession,
    ctx: &egui::Context,
    open_requests: &mut MessageWriter<OpenImportSession>,
) {
    egui::TopBottomPanel::bottom("hud_bottom_bar")
        .resizable(false)
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal_centered(|ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128))
                    .corner_radius(egui::CornerRadius::same(12))
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let design_clicked = ui
                                .add_enabled(
                                    !import_session.is_open(),
                                    egui::Button::new("Design avatar")
                                        .min_size(egui::vec2(150.0, 34.0)),
                                )
                                .clicked();
                            if design_clicked {
                                hud_state.editor_payload.clear();
                                open_requests.write(OpenImportSession);
                            }

                            if ui
                                .add_sized(egui::vec2(110.0, 34.0), egui::Button::new("Settings"))
                                .clicked()
                            {
                                hud_state.settings_open = true;
                                hud_state.settings_tab = SettingsTab::Graphics;
                                hud_state.draft = settings_resource.current.clone();
                            }
                        });
                    });
            });
            ui.add_space(8.0);
        });
}

fn draw_import_dialog(
    hud_state: &mut HudUiState,
    import_session: &ImportSession,
    ctx: &egui::Context,
    cancel_requests: &mut MessageWriter<CancelImportSession>,
    payloads: &mut MessageWriter<EditorPayloadReceived>,
) {
    let mut window_open = true;
    let mut should_deliver = false;
    let mut should_cancel = false;

    egui::Window::new("Design your avatar")
        .open(&mut window_open)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(520.0)
        .show(ctx, |ui| {
            ui.label("Finish your avatar in the editor and it appears in the room:");
            ui.hyperlink(import_session.editor_url());
            ui.add_space(6.0);

            if import_session.is_frame_ready() {
                ui.label("The editor is ready.");
            } else {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Waiting for the editor to finish loading...");
                });
            }

            ui.add_space(6.0);
            ui.label("Editor messages");
            ui.add(
                egui::TextEdit::multiline(&mut hud_state.editor_payload)
                    .desired_rows(3)
                    .desired_width(480.0)
                    .hint_text("Paste a message posted by the editor page"),
            );

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                should_deliver = ui
                    .add_enabled(
                        !hud_state.editor_payload.trim().is_empty(),
                        egui::Button::new("Deliver message"),
                    )
                    .clicked();

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    should_cancel = ui.button("Cancel").clicked();
                });
            });
        });

    if should_deliver {
        let raw = hud_state.editor_payload.trim().to_string();
        payloads.write(EditorPayloadReceived { raw });
        hud_state.editor_payload.clear();
    }

    if should_cancel || !window_open {
        cancel_requests.write(CancelImportSession);
    }
}

fn draw_photo_details(hud_state: &mut HudUiState, record: &PhotoRecord, ctx: &egui::Context) {
    let mut window_open = true;
    let mut should_close = false;

    egui::Window::new("Photo")
        .open(&mut window_open)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -40.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(360.0)
        .show(ctx, |ui| {
            ui.heading(&record.display_name);
            if let Some(created_at) = &record.created_at {
                ui.label(format!("Captured {created_at}"));
            }
            if record.asset_reference.is_none() {
                ui.label("No picture is attached to this memory yet.");
            }
            ui.add_space(8.0);
            should_close = ui.button("Close").clicked();
        });

    if should_close || !window_open {
        hud_state.selected_photo = None;
    }
}

fn draw_empty_gallery_hint(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("empty_gallery_hint"))
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 90.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 150))
                .corner_radius(egui::CornerRadius::same(10))
                .inner_margin(egui::Margin::symmetric(14, 10))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("Upload photos to see them displayed here!")
                            .color(egui::Color32::WHITE),
                    );
                });
        });
}

fn draw_settings_modal(
    hud_state: &mut HudUiState,
    settings_resource: &mut SettingsResource,
    ctx: &egui::Context,
) {
    let was_open = hud_state.settings_open;
    let mut window_open = hud_state.settings_open;
    let mut should_apply = false;
    let mut should_close = false;

    egui::Window::new("Settings")
        .open(&mut window_open)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(480.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(
                    &mut hud_state.settings_tab,
                    SettingsTab::Graphics,
                    "Graphics",
                );
                ui.selectable_value(&mut hud_state.settings_tab, SettingsTab::Camera, "Camera");
            });

            ui.separator();

            match hud_state.settings_tab {
                SettingsTab::Graphics => {
                    draw_graphics_settings_tab(ui, &mut hud_state.draft);
                }
                SettingsTab::Camera => {
                    draw_camera_settings_tab(ui, &mut hud_state.draft);
                }
            }

            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                should_apply = ui.button("Apply").clicked();
                should_close = ui.button("Close").clicked();
            });
        });

    if should_apply {
        hud_state.draft.camera = hud_state.draft.camera.sanitized();
        settings_resource.current = hud_state.draft.clone();
        if let Err(error) = settings_resource.save_to_disk() {
            warn!(
                "Failed to save settings file '{}': {}",
                settings::SETTINGS_FILE_PATH,
                error
            );
        }
    }

    if should_close {
        window_open = false;
        hud_state.draft = settings_resource.current.clone();
    }

    hud_state.settings_open = window_open;

    if was_open && !hud_state.settings_open {
        hud_state.draft = settings_resource.current.clone();
    }
}

fn draw_graphics_settings_tab(ui: &mut egui::Ui, draft: &mut ViewerSettings) {
    egui::ComboBox::from_label("Window mode")
        .selected_text(draft.graphics.window_mode.label())
        .show_ui(ui, |ui| {
            for option in WindowModeSetting::ALL {
                ui.selectable_value(&mut draft.graphics.window_mode, option, option.label());
            }
        });

    egui::ComboBox::from_label("Resolution")
        .selected_text(draft.graphics.resolution.label())
        .show_ui(ui, |ui| {
            for option in ResolutionSetting::presets() {
                ui.selectable_value(&mut draft.graphics.resolution, *option, option.label());
            }
        });

    egui::ComboBox::from_label("FPS limit")
        .selected_text(draft.graphics.fps_limit.label())
        .show_ui(ui, |ui| {
            for option in FpsLimitSetting::ALL {
                ui.selectable_value(&mut draft.graphics.fps_limit, option, option.label());
            }
        });

    ui.checkbox(&mut draft.graphics.vsync, "VSync");
}

fn draw_camera_settings_tab(ui: &mut egui::Ui, draft: &mut ViewerSettings) {
    ui.add(egui::Slider::new(&mut draft.camera.min_distance, 0.5..=8.0).text("Closest zoom"));
    ui.add(egui::Slider::new(&mut draft.camera.max_distance, 4.0..=20.0).text("Farthest zoom"));
    ui.add(egui::Slider::new(&mut draft.camera.damping, 0.01..=0.5).text("Camera glide"));
}

/// Projects the avatar name chips and the hovered photo caption into the
/// viewport. Chips are non-interactable so they never steal the pointer
/// from the frames they sit over.
fn draw_room_labels(
    mut contexts: EguiContexts,
    identity: Res<SessionIdentity>,
    cameras: Query<(&Camera, &GlobalTransform), With<RoomCamera>>,
    avatars: Query<(Entity, &AvatarKind, &BehaviorState, &GlobalTransform)>,
    frames: Query<(Entity, &PhotoFrame, &FrameHover, &GlobalTransform)>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for (entity, kind, behavior, transform) in &avatars {
        let anchor = transform.translation() + Vec3::Y * kind.label_height();
        let Ok(viewport) = camera.world_to_viewport(camera_transform, anchor) else {
            continue;
        };
        let fill = match kind {
            AvatarKind::User => egui::Color32::from_rgba_unmultiplied(0, 0, 0, 179),
            AvatarKind::Companion => egui::Color32::from_rgba_unmultiplied(139, 69, 19, 204),
        };
        let text = avatar_label(*kind, &identity, behavior.is_reacting());
        draw_anchored_chip(
            ctx,
            egui::Id::new(("avatar_label", entity)),
            viewport,
            fill,
            &text,
        );
    }

    let mut any_hovered = false;
    for (entity, frame, hover, transform) in &frames {
        if !hover.hovered {
            continue;
        }
        any_hovered = true;
        let anchor = transform.translation() + Vec3::Y * (frame::PHOTO_HALF_EXTENT + 0.2);
        let Ok(viewport) = camera.world_to_viewport(camera_transform, anchor) else {
            continue;
        };
        draw_anchored_chip(
            ctx,
            egui::Id::new(("photo_caption", entity)),
            viewport,
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 179),
            &frame.record.display_name,
        );
    }

    if any_hovered {
        ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
    }
}

fn draw_anchored_chip(
    ctx: &egui::Context,
    id: egui::Id,
    viewport: Vec2,
    fill: egui::Color32,
    text: &str,
) {
    egui::Area::new(id)
        .pivot(egui::Align2::CENTER_BOTTOM)
        .fixed_pos(egui::pos2(viewport.x, viewport.y))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(fill)
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::symmetric(8, 4))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .color(egui::Color32::WHITE)
                            .strong(),
                    );
                });
        });
}

fn sync_pointer_capture(mut contexts: EguiContexts, mut capture: ResMut<UiPointerCapture>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let captured = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    if capture.captured != captured {
        capture.captured = captured;
    }
}
