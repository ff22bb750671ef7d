//! eframe host for one selection session.
//!
//! Shows the (possibly downscaled) preview, forwards egui input to the
//! session and paints the selection. The outcome is handed back to `main`
//! through a shared cell once the window closes.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::anyhow;
use crop_select::config::Config;
use crop_select::{
    InteractionState, Key, Modifiers, Point, PointerButton, SelectionEvent, SelectionRect,
    SelectionSession, SessionOutcome, SourceImage, Transition, Viewport, preview_image,
};
use eframe::egui;
use image::DynamicImage;
use tracing::{debug, warn};

const WINDOW_TITLE: &str = "Select area to crop (Enter/Space to confirm, Esc to cancel)";

/// Opens the selection window and blocks until it closes.
///
/// A window closed without Enter/Escape yields `Cancelled`.
pub fn run_selection(source: Rc<DynamicImage>, config: Config) -> anyhow::Result<SessionOutcome> {
    let descriptor = SourceImage::new(source.width(), source.height(), ());
    let fallback = config.viewport(None);
    // Validates the image before any window exists.
    let session =
        SelectionSession::with_move_modifier(&descriptor, fallback, config.move_modifier)?;
    let initial = *session.scale();

    let outcome = Rc::new(Cell::new(None));
    let app_outcome = Rc::clone(&outcome);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([initial.display_width as f32, initial.display_height as f32])
            .with_resizable(false)
            .with_always_on_top(),
        ..Default::default()
    };
    eframe::run_native(
        "Crop Select",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(CropApp {
                source,
                config,
                descriptor,
                session,
                texture: None,
                outcome: app_outcome,
            }))
        }),
    )
    .map_err(|e| anyhow!("window error: {e}"))?;

    Ok(outcome.get().unwrap_or(SessionOutcome::Cancelled))
}

struct CropApp {
    source: Rc<DynamicImage>,
    config: Config,
    descriptor: SourceImage<()>,
    session: SelectionSession,
    /// Uploaded on the first frame, once the monitor size is known.
    texture: Option<egui::TextureHandle>,
    outcome: Rc<Cell<Option<SessionOutcome>>>,
}

impl CropApp {
    fn start(&mut self, ctx: &egui::Context) {
        let monitor = ctx
            .input(|i| i.viewport().monitor_size)
            .map(|size| (size.x as u32, size.y as u32));
        let viewport: Viewport = self.config.viewport(monitor);

        let modifier = self.config.move_modifier;
        match SelectionSession::with_move_modifier(&self.descriptor, viewport, modifier) {
            Ok(session) => self.session = session,
            Err(err) => warn!(%err, "keeping fallback viewport"),
        }

        let scale = *self.session.scale();
        let preview = preview_image(&self.source, &scale, self.config.preview_filter);
        let shown = preview.as_ref().unwrap_or(&*self.source);
        let size = [shown.width() as _, shown.height() as _];
        let image_buffer = shown.to_rgba8();
        let pixels = image_buffer.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        self.texture = Some(ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR));

        let display = egui::vec2(scale.display_width as f32, scale.display_height as f32);
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(display));
        if let Some((w, h)) = monitor {
            let x = (w as f32 - display.x).max(0.0) / 2.0;
            let y = (h as f32 - display.y).max(0.0) / 2.0;
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        debug!(?monitor, ?viewport, ?scale, "preview ready");
    }

    fn finish(&mut self, ctx: &egui::Context, outcome: SessionOutcome) {
        if self.outcome.get().is_none() {
            self.outcome.set(Some(outcome));
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl eframe::App for CropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.texture.is_none() {
            self.start(ctx);
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            let outcome = self.session.abandon();
            self.finish(ctx, outcome);
            return;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let scale = *self.session.scale();
                let image_rect = egui::Rect::from_min_size(
                    ui.max_rect().min,
                    egui::vec2(scale.display_width as f32, scale.display_height as f32),
                );
                ui.allocate_rect(image_rect, egui::Sense::click_and_drag());

                let (raw, double_clicked) = ctx.input(|i| {
                    (
                        i.events.clone(),
                        i.pointer.button_double_clicked(egui::PointerButton::Primary),
                    )
                });
                for event in translate_events(&raw, image_rect.min, double_clicked) {
                    if let Transition::Finished(outcome) = self.session.handle(event) {
                        self.finish(ctx, outcome);
                        break;
                    }
                }

                let painter = ui.painter_at(image_rect);
                if let Some(texture) = &self.texture {
                    painter.image(
                        texture.id(),
                        image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                if let Some(rect) = self.session.rect() {
                    paint_selection(&painter, image_rect, rect);
                }
            });

        let cursor = match self.session.state() {
            InteractionState::Moving => egui::CursorIcon::Grabbing,
            _ => egui::CursorIcon::Crosshair,
        };
        ctx.set_cursor_icon(cursor);
    }
}

/// Dims everything outside the selection and draws the white/black outline pair.
fn paint_selection(painter: &egui::Painter, image_rect: egui::Rect, rect: SelectionRect) {
    let min = image_rect.min;
    let screen_crop_rect = egui::Rect::from_min_max(
        min + egui::vec2(rect.x1 as f32, rect.y1 as f32),
        min + egui::vec2(rect.x2 as f32, rect.y2 as f32),
    );
    let overlay_color = egui::Color32::from_black_alpha(110);

    // Top
    painter.rect_filled(
        egui::Rect::from_min_max(
            image_rect.min,
            egui::pos2(image_rect.max.x, screen_crop_rect.min.y),
        ),
        0.0,
        overlay_color,
    );
    // Bottom
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, screen_crop_rect.max.y),
            image_rect.max,
        ),
        0.0,
        overlay_color,
    );
    // Left
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, screen_crop_rect.min.y),
            egui::pos2(screen_crop_rect.min.x, screen_crop_rect.max.y),
        ),
        0.0,
        overlay_color,
    );
    // Right
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(screen_crop_rect.max.x, screen_crop_rect.min.y),
            egui::pos2(image_rect.max.x, screen_crop_rect.max.y),
        ),
        0.0,
        overlay_color,
    );

    painter.rect_stroke(screen_crop_rect, 0.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
    let outline = [
        screen_crop_rect.left_top(),
        screen_crop_rect.right_top(),
        screen_crop_rect.right_bottom(),
        screen_crop_rect.left_bottom(),
        screen_crop_rect.left_top(),
    ];
    painter.extend(egui::Shape::dashed_line(
        &outline,
        egui::Stroke::new(1.0, egui::Color32::BLACK),
        3.0,
        2.0,
    ));
}

/// Converts one frame of egui input into selection events, with positions
/// relative to `origin`. A double-click adds a trailing confirm.
fn translate_events(
    events: &[egui::Event],
    origin: egui::Pos2,
    double_clicked: bool,
) -> Vec<SelectionEvent> {
    let to_point = |pos: egui::Pos2| {
        Point::new(
            (pos.x - origin.x).round() as i32,
            (pos.y - origin.y).round() as i32,
        )
    };

    let mut out: Vec<SelectionEvent> = events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
            } => {
                let button = match button {
                    egui::PointerButton::Primary => PointerButton::Primary,
                    egui::PointerButton::Secondary => PointerButton::Secondary,
                    egui::PointerButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                let pos = to_point(*pos);
                Some(if *pressed {
                    SelectionEvent::PointerDown {
                        pos,
                        button,
                        modifiers: Modifiers {
                            shift: modifiers.shift,
                            ctrl: modifiers.command,
                            alt: modifiers.alt,
                        },
                    }
                } else {
                    SelectionEvent::PointerUp { pos, button }
                })
            }
            egui::Event::PointerMoved(pos) => Some(SelectionEvent::PointerMove {
                pos: to_point(*pos),
            }),
            egui::Event::Key {
                key, pressed: true, ..
            } => {
                let key = match key {
                    egui::Key::Enter => Key::Enter,
                    egui::Key::Space => Key::Space,
                    egui::Key::Escape => Key::Escape,
                    _ => Key::Other,
                };
                SelectionEvent::from_key(key)
            }
            _ => None,
        })
        .collect();

    if double_clicked {
        out.push(SelectionEvent::Confirm);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(
        x: f32,
        y: f32,
        button: egui::PointerButton,
        modifiers: egui::Modifiers,
    ) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button,
            pressed: true,
            modifiers,
        }
    }

    fn key(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn pointer_positions_are_relative_to_the_preview() {
        let events = [
            press(110.4, 52.6, egui::PointerButton::Primary, egui::Modifiers::SHIFT),
            egui::Event::PointerMoved(egui::pos2(90.0, 40.0)),
        ];
        let out = translate_events(&events, egui::pos2(10.0, 20.0), false);
        assert_eq!(
            out,
            vec![
                SelectionEvent::PointerDown {
                    pos: Point::new(100, 33),
                    button: PointerButton::Primary,
                    modifiers: Modifiers::SHIFT,
                },
                SelectionEvent::PointerMove {
                    pos: Point::new(80, 20)
                },
            ]
        );
    }

    #[test]
    fn keys_and_double_click_map_to_terminal_events() {
        let events = [key(egui::Key::Escape), key(egui::Key::A), key(egui::Key::Enter)];
        let out = translate_events(&events, egui::Pos2::ZERO, true);
        assert_eq!(
            out,
            vec![
                SelectionEvent::Cancel,
                SelectionEvent::Confirm,
                SelectionEvent::Confirm
            ]
        );
    }

    #[test]
    fn secondary_click_is_forwarded() {
        let events = [press(1.0, 1.0, egui::PointerButton::Secondary, egui::Modifiers::NONE)];
        let out = translate_events(&events, egui::Pos2::ZERO, false);
        assert!(matches!(
            out.as_slice(),
            [SelectionEvent::PointerDown {
                button: PointerButton::Secondary,
                ..
            }]
        ));
    }
}
