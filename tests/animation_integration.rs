//! Animation integration tests: sheets, controllers, sequences and views
//! working together without a window or GPU.

use std::cell::RefCell;
use std::rc::Rc;

use raylib::prelude::{Rectangle, Vector2};

use spritereel::components::animationcontroller::{AnimationController, PlaybackState};
use spritereel::components::animationsequence::AnimationSequence;
use spritereel::components::animationview::AnimationView;
use spritereel::components::reel::{Direction, Reel};
use spritereel::error::AnimationError;
use spritereel::events::animation::{
    AnimationEvent, AnimationEventKind, SequenceEvent, SequenceEventKind,
};
use spritereel::resources::spritesheet::{SheetImage, SpriteSheet};
use spritereel::systems::render::Canvas;

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// In-memory stand-in for a decoded 320x256 sheet image.
struct TestImage;

impl SheetImage for TestImage {
    fn dimensions(&self) -> (f32, f32) {
        (320.0, 256.0)
    }
}

#[derive(Default)]
struct RecordingCanvas {
    draws: Vec<(Rectangle, Rectangle)>,
}

impl Canvas<TestImage> for RecordingCanvas {
    fn blit(&mut self, _image: &TestImage, src: Rectangle, dest: Rectangle) {
        self.draws.push((src, dest));
    }
}

fn row(y: f32, frames: usize) -> Reel {
    Reel::build(
        Direction::Horizontal,
        Vector2::new(0.0, y),
        Vector2::new(64.0, 64.0),
        frames,
    )
}

/// The monster sheet used by the viewer demo.
fn monster_sheet() -> Rc<SpriteSheet<TestImage>> {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    sheet.add_reel("idle", row(0.0, 5));
    sheet.add_reel("attack", row(64.0, 5));
    sheet.add_reel("hurt", row(128.0, 3));
    sheet
}

fn record_events(controller: &mut AnimationController) -> Rc<RefCell<Vec<AnimationEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        AnimationEventKind::Started,
        AnimationEventKind::Stopped,
        AnimationEventKind::Finished,
    ] {
        let events = events.clone();
        controller.subscribe(kind, move |ev| events.borrow_mut().push(ev.clone()));
    }
    events
}

#[test]
fn horizontal_and_vertical_reels_tile_the_sheet() {
    let offset = Vector2::new(16.0, 32.0);
    let size = Vector2::new(24.0, 40.0);
    let horizontal = Reel::build(Direction::Horizontal, offset, size, 6);
    let vertical = Reel::build(Direction::Vertical, offset, size, 6);

    for i in 0..6 {
        let h = horizontal.rect(i).unwrap();
        assert!(approx_eq(h.x, offset.x + i as f32 * size.x));
        assert!(approx_eq(h.y, offset.y));
        assert!(approx_eq(h.width, size.x));
        assert!(approx_eq(h.height, size.y));

        let v = vertical.rect(i).unwrap();
        assert!(approx_eq(v.x, offset.x));
        assert!(approx_eq(v.y, offset.y + i as f32 * size.y));
    }
}

#[test]
fn single_pass_controller_emits_one_stop_and_one_finish() {
    let sheet = monster_sheet();
    let mut controller = AnimationController::new(&sheet, "hurt").unwrap();
    let events = record_events(&mut controller);
    controller.start(50.0, 0);

    let mut delivered = 0.0;
    while controller.is_active() {
        controller.update(50.0);
        delivered += 50.0;
        assert!(delivered <= 1000.0, "controller never finished");
    }
    // Three frames of 50 ms, the last one observed one tick late.
    assert!(approx_eq(delivered, 150.0));
    assert_eq!(controller.state(), PlaybackState::Stopped);

    // Further ticks change nothing.
    controller.update(500.0);
    assert_eq!(controller.current_index(), 2);

    let events = events.borrow();
    let stopped = events
        .iter()
        .filter(|e| matches!(e, AnimationEvent::Stopped { .. }))
        .count();
    let finished = events
        .iter()
        .filter(|e| matches!(e, AnimationEvent::Finished { .. }))
        .count();
    assert_eq!(stopped, 1);
    assert_eq!(finished, 1);
}

#[test]
fn repeat_limit_counts_cycles_until_finish() {
    let sheet = monster_sheet();
    let mut controller = AnimationController::new(&sheet, "idle").unwrap();
    let cycles = Rc::new(RefCell::new(Vec::new()));
    let seen = cycles.clone();
    controller.subscribe(AnimationEventKind::Finished, move |ev| {
        if let AnimationEvent::Finished { cycles, .. } = ev {
            seen.borrow_mut().push(*cycles);
        }
    });

    controller.start(10.0, 3);
    for _ in 0..1000 {
        controller.update(10.0);
    }
    assert!(!controller.is_active());
    assert_eq!(controller.completed_cycles(), 4);
    assert_eq!(*cycles.borrow(), vec![4]);
}

#[test]
fn sequence_hands_off_without_auto_chaining() {
    let sheet = monster_sheet();
    let mut sequence = AnimationSequence::new(sheet.clone());
    sequence.add_animation("idle", 100.0, 0).unwrap();
    sequence.add_animation("attack", 50.0, 1).unwrap();

    let advanced = Rc::new(RefCell::new(Vec::new()));
    let a = advanced.clone();
    sequence.subscribe(SequenceEventKind::Advanced, move |ev| {
        a.borrow_mut().push(ev.clone());
    });

    sequence.start().unwrap();
    sequence.update(100.0);
    assert_eq!(sequence.current_position(), 0);
    assert!(sequence.controller(0).unwrap().is_active());
    assert_eq!(sequence.controller(0).unwrap().current_index(), 0);
    assert!(!sequence.controller(1).unwrap().is_active());

    // idle: 5 frames at 100 ms, the fifth tick reaches the last frame.
    for _ in 0..4 {
        sequence.update(100.0);
    }
    assert!(!sequence.controller(0).unwrap().is_active());
    assert_eq!(sequence.current_position(), 1);
    assert!(sequence.is_active());

    let attack = sequence.current_controller().unwrap();
    assert_eq!(attack.name(), "attack");
    assert!(!attack.is_active());
    assert_eq!(attack.state(), PlaybackState::Idle);
    assert_eq!(
        *advanced.borrow(),
        vec![SequenceEvent::Advanced {
            position: 1,
            name: "attack".into()
        }]
    );

    // Explicit hand-off plays attack with its recorded arguments.
    assert!(sequence.start_current());
    let attack = sequence.current_controller().unwrap();
    assert!(attack.is_active());
    assert_eq!(attack.repeats(), 1);
    assert!(approx_eq(attack.frame_duration(), 50.0));
}

#[test]
fn unstarted_entry_is_skipped_on_the_next_update() {
    let sheet = monster_sheet();
    let mut sequence = AnimationSequence::new(sheet);
    sequence.add_animation("hurt", 0.0, 0).unwrap();
    sequence.add_animation("idle", 0.0, 0).unwrap();
    let finished = Rc::new(RefCell::new(0));
    let f = finished.clone();
    sequence.subscribe(SequenceEventKind::Finished, move |_| *f.borrow_mut() += 1);

    sequence.start().unwrap();
    sequence.update(1.0);
    sequence.update(1.0);
    assert_eq!(sequence.current_position(), 1);

    sequence.update(1.0);
    assert_eq!(sequence.current_position(), 2);
    assert!(!sequence.is_active());
    assert_eq!(*finished.borrow(), 1);
}

#[test]
fn view_only_sees_reels_registered_after_it() {
    let sheet = monster_sheet();
    let view = AnimationView::new(sheet.clone());
    assert_eq!(view.controller_count(), 0);
    assert_eq!(view.start_animation("idle", 100.0, 0), 0);

    sheet.add_reel("dead", row(192.0, 5));
    assert_eq!(view.controller_count(), 1);
    let dead = view.controllers("dead");
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].borrow().name(), "dead");
}

#[test]
fn start_and_stop_by_name_report_matches() {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    let view = AnimationView::new(sheet.clone());
    sheet.add_reel("idle", row(0.0, 5));
    sheet.add_reel("idle", row(0.0, 4));
    sheet.add_reel("attack", row(64.0, 5));

    assert_eq!(view.start_animation("missing", 100.0, 0), 0);
    assert_eq!(view.controller_count(), 3);

    // Re-registering a name adds another controller for it.
    assert_eq!(view.start_animation("idle", 100.0, 0), 2);
    assert_eq!(view.stop_animation("idle"), 2);
    assert_eq!(view.stop_animation("idle"), 2);
    assert_eq!(view.stop_animation("missing"), 0);
    assert!(view.controllers("idle").iter().all(|c| !c.borrow().is_active()));
}

#[test]
fn view_update_drives_controllers_and_sequence() {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    let view = AnimationView::new(sheet.clone());
    sheet.add_reel("idle", row(0.0, 5));
    sheet.add_reel("attack", row(64.0, 5));

    let mut sequence = AnimationSequence::new(sheet.clone());
    sequence.add_animation("attack", 0.0, 0).unwrap();
    sequence.start().unwrap();
    view.set_sequence(sequence);

    view.start_animation("idle", 0.0, 2);
    view.update(1.0);
    view.update(1.0);

    assert_eq!(view.controllers("idle")[0].borrow().current_index(), 2);
    assert_eq!(
        view.with_sequence(|s| s.current_controller().map(|c| c.current_index())),
        Some(Some(2))
    );
    // The view's own attack controller was never started.
    assert_eq!(view.controllers("attack")[0].borrow().current_index(), 0);
}

#[test]
fn render_draws_sequence_and_active_controllers_at_offsets() {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    let view = AnimationView::new(sheet.clone());
    sheet.add_reel("idle", row(0.0, 5));
    sheet.add_reel("hurt", row(128.0, 3));
    view.set_position(Vector2::new(10.0, 20.0));

    let mut sequence = AnimationSequence::new(sheet.clone());
    sequence.add_animation("hurt", 100.0, 0).unwrap();
    sequence.start().unwrap();
    view.set_sequence(sequence);
    view.start_animation("idle", 100.0, 0);
    view.controllers("idle")[0].borrow_mut().position = Vector2::new(64.0, 0.0);

    let mut engine = spritereel::engine::Engine::new();
    let mut canvas = RecordingCanvas::default();
    assert_eq!(view.render(&mut engine, &mut canvas), 2);

    let (seq_src, seq_dest) = canvas.draws[0];
    assert!(approx_eq(seq_src.y, 128.0));
    assert!(approx_eq(seq_dest.x, 10.0));
    assert!(approx_eq(seq_dest.y, 20.0));

    let (idle_src, idle_dest) = canvas.draws[1];
    assert!(approx_eq(idle_src.y, 0.0));
    assert!(approx_eq(idle_dest.x, 74.0));
    assert!(approx_eq(idle_dest.width, 64.0));
}

#[test]
fn missing_reel_fails_controller_and_sequence_construction() {
    let sheet = monster_sheet();
    assert!(matches!(
        AnimationController::new(&sheet, "dead"),
        Err(AnimationError::ReelNotFound(_))
    ));
    let mut sequence = AnimationSequence::new(sheet);
    assert!(matches!(
        sequence.add_animation("dead", 100.0, 0),
        Err(AnimationError::ReelNotFound(_))
    ));
}

#[test]
fn advanced_handler_hands_over_through_the_view() {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    let view = AnimationView::new(sheet.clone());
    sheet.add_reel("idle", row(0.0, 2));
    sheet.add_reel("attack", row(64.0, 5));

    let mut sequence = AnimationSequence::new(sheet.clone());
    sequence.add_animation("idle", 0.0, 0).unwrap();
    sequence.add_animation("attack", 0.0, 0).unwrap();

    let handed_over = Rc::new(RefCell::new(Vec::new()));
    let h = handed_over.clone();
    let v = view.clone();
    sequence.subscribe(SequenceEventKind::Advanced, move |ev| {
        let started = v.with_sequence(|s| s.start_current());
        h.borrow_mut().push((ev.clone(), started, v.controller_count()));
    });
    let finished = Rc::new(RefCell::new(Vec::new()));
    let f = finished.clone();
    let v = view.clone();
    sequence.subscribe(SequenceEventKind::Finished, move |_| {
        f.borrow_mut().push(v.position());
    });
    sequence.start().unwrap();
    view.set_sequence(sequence);

    // idle has two frames: the first update reaches its last frame and ends it.
    view.update(1.0);
    assert_eq!(
        *handed_over.borrow(),
        vec![(
            SequenceEvent::Advanced {
                position: 1,
                name: "attack".into()
            },
            Some(true),
            2
        )]
    );
    assert_eq!(
        view.with_sequence(|s| (s.current_position(), s.current_controller().unwrap().is_active())),
        Some((1, true))
    );

    view.update(1.0);
    assert_eq!(
        view.with_sequence(|s| s.current_controller().unwrap().current_index()),
        Some(1)
    );
    for _ in 0..3 {
        view.update(1.0);
    }
    assert_eq!(finished.borrow().len(), 1);
    assert_eq!(view.with_sequence(|s| s.is_active()), Some(false));
}

#[test]
fn finished_handler_restarts_its_reel_through_the_view() {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    let view = AnimationView::new(sheet.clone());
    sheet.add_reel("hurt", row(128.0, 3));

    let restarts = Rc::new(RefCell::new(Vec::new()));
    let handles = view.controllers("hurt");
    let events = record_events(&mut handles[0].borrow_mut());
    let r = restarts.clone();
    let v = view.clone();
    handles[0]
        .borrow_mut()
        .subscribe(AnimationEventKind::Finished, move |_| {
            r.borrow_mut().push(v.start_animation("hurt", 0.0, 0));
        });

    assert_eq!(view.start_animation("hurt", 0.0, 0), 1);
    view.update(1.0);
    view.update(1.0);

    assert_eq!(*restarts.borrow(), vec![1]);
    let hurt = handles[0].borrow();
    assert!(hurt.is_active());
    assert_eq!(hurt.state(), PlaybackState::Playing);
    assert_eq!(hurt.current_index(), 0);
    assert_eq!(hurt.completed_cycles(), 0);
    assert_eq!(
        *events.borrow(),
        vec![
            AnimationEvent::Started { name: "hurt".into() },
            AnimationEvent::Stopped { name: "hurt".into() },
            AnimationEvent::Finished {
                name: "hurt".into(),
                cycles: 1
            },
            AnimationEvent::Started { name: "hurt".into() },
        ]
    );
}

#[test]
fn controller_handler_can_register_reels_during_view_update() {
    let sheet = Rc::new(SpriteSheet::new(TestImage));
    let view = AnimationView::new(sheet.clone());
    sheet.add_reel("idle", row(0.0, 2));

    let s = sheet.clone();
    view.controllers("idle")[0]
        .borrow_mut()
        .subscribe(AnimationEventKind::Finished, move |_| {
            s.add_reel("dead", row(192.0, 5));
        });
    view.start_animation("idle", 0.0, 0);
    view.update(1.0);

    assert!(sheet.contains_reel("dead"));
    assert_eq!(view.controller_count(), 2);
    let dead = view.controllers("dead");
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].borrow().state(), PlaybackState::Idle);
}
