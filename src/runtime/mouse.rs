use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::App;
use crate::ui::{UiAreas, ratio_at, visible_window};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Drag {
    Seek,
    Volume,
}

/// Which bar, if any, the left button is holding.
#[derive(Debug, Default)]
pub struct MouseState {
    drag: Option<Drag>,
}

fn hit(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

fn volume_at(bar: Rect, column: u16) -> u8 {
    (ratio_at(bar, column) * 100.0).round() as u8
}

/// Map a mouse event onto app actions using the areas of the last frame.
pub fn handle_mouse(
    app: &mut App,
    areas: &UiAreas,
    state: &mut MouseState,
    event: MouseEvent,
    now: Instant,
) {
    let (column, row) = (event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(areas.seek, column, row) {
                state.drag = Some(Drag::Seek);
                app.begin_seek(ratio_at(areas.seek, column));
            } else if hit(areas.volume, column, row) {
                state.drag = Some(Drag::Volume);
                app.set_volume(volume_at(areas.volume, column));
            } else if hit(areas.playlist, column, row) {
                let list = areas.playlist;
                let (start, end) =
                    visible_window(app.tracks().len(), list.height as usize, app.selected);
                let idx = start + usize::from(row - list.y);
                if idx < end {
                    app.click_row(idx, now);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => match state.drag {
            Some(Drag::Seek) => app.drag_seek(ratio_at(areas.seek, column)),
            Some(Drag::Volume) => app.set_volume(volume_at(areas.volume, column)),
            None => {}
        },
        MouseEventKind::Up(MouseButton::Left) => {
            if state.drag.take() == Some(Drag::Seek) {
                app.end_seek();
            }
        }
        MouseEventKind::ScrollDown if hit(areas.playlist, column, row) => app.select_next(),
        MouseEventKind::ScrollUp if hit(areas.playlist, column, row) => app.select_prev(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::{Call, FakeFactory, FakeHandle, track};
    use crate::engine::{EngineEvent, EngineEventKind};
    use crate::session::PlaybackSession;
    use crate::ui::layout;
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc;
    use std::time::Duration;

    fn setup(names: &[&str]) -> (App, FakeHandle, UiAreas) {
        let (factory, controls) = FakeFactory::new();
        let (tx, _rx) = mpsc::channel();
        let mut session = PlaybackSession::new(Box::new(factory), tx, 50);
        session.add_tracks(names.iter().map(|n| track(n)).collect());
        let mut app = App::new(session, 50);
        if let Some(engine) = app.session.engine_id() {
            app.handle_engine_event(EngineEvent {
                engine,
                kind: EngineEventKind::Ready(Some(Duration::from_secs(100))),
            });
        }
        controls.borrow_mut().calls.clear();
        (app, controls, layout(Rect::new(0, 0, 80, 24)))
    }

    fn ev(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn send(app: &mut App, areas: &UiAreas, state: &mut MouseState, e: MouseEvent) {
        handle_mouse(app, areas, state, e, Instant::now());
    }

    const DOWN: MouseEventKind = MouseEventKind::Down(MouseButton::Left);
    const DRAG: MouseEventKind = MouseEventKind::Drag(MouseButton::Left);
    const UP: MouseEventKind = MouseEventKind::Up(MouseButton::Left);

    #[test]
    fn seek_bar_press_drag_release_seeks_once() {
        let (mut app, controls, areas) = setup(&["a"]);
        let mut state = MouseState::default();
        let bar = areas.seek;
        let row = bar.y;

        send(&mut app, &areas, &mut state, ev(DOWN, bar.x, row));
        send(&mut app, &areas, &mut state, ev(DRAG, bar.x + bar.width - 1, row));
        assert!(controls.borrow().calls.is_empty());
        assert!(app.transport.seek().is_dragging());

        // Where the button comes up does not matter.
        send(&mut app, &areas, &mut state, ev(UP, 200, 0));
        assert_eq!(
            controls.borrow().calls,
            vec![Call::Seek(1, Duration::from_secs(100))]
        );
        assert!(!app.transport.seek().is_dragging());
    }

    #[test]
    fn volume_bar_click_and_drag_set_volume() {
        let (mut app, controls, areas) = setup(&["a"]);
        let mut state = MouseState::default();
        let bar = areas.volume;

        send(&mut app, &areas, &mut state, ev(DOWN, bar.x, bar.y));
        assert_eq!(app.transport.volume().value(), 0);
        send(&mut app, &areas, &mut state, ev(DRAG, bar.x + bar.width - 1, bar.y));
        assert_eq!(app.transport.volume().value(), 100);
        send(&mut app, &areas, &mut state, ev(UP, 0, 0));

        let seeks = controls
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Seek(..)))
            .count();
        assert_eq!(seeks, 0);
    }

    #[test]
    fn double_click_on_a_row_plays_it() {
        let (mut app, _c, areas) = setup(&["a", "b", "c"]);
        let mut state = MouseState::default();
        let list = areas.playlist;
        let t0 = Instant::now();

        let click = ev(DOWN, list.x + 2, list.y + 2);
        handle_mouse(&mut app, &areas, &mut state, click, t0);
        assert_eq!(app.selected, 2);
        handle_mouse(&mut app, &areas, &mut state, click, t0 + Duration::from_millis(100));
        assert_eq!(app.session.active_index(), Some(2));
    }

    #[test]
    fn clicks_below_the_last_row_are_ignored() {
        let (mut app, _c, areas) = setup(&["a"]);
        let mut state = MouseState::default();
        let list = areas.playlist;
        send(&mut app, &areas, &mut state, ev(DOWN, list.x, list.y + 5));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn scrolling_over_the_playlist_moves_the_cursor() {
        let (mut app, _c, areas) = setup(&["a", "b"]);
        let mut state = MouseState::default();
        let list = areas.playlist;
        send(&mut app, &areas, &mut state, ev(MouseEventKind::ScrollDown, list.x, list.y));
        assert_eq!(app.selected, 1);
        send(&mut app, &areas, &mut state, ev(MouseEventKind::ScrollUp, list.x, list.y));
        assert_eq!(app.selected, 0);
        // Outside the list nothing happens.
        send(&mut app, &areas, &mut state, ev(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(app.selected, 0);
    }
}
