use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::Fps;
use crate::frame::DeviceType;

fn fc() -> FrameConstants {
    FrameConstants::new(Fps::new(10.0).unwrap(), DeviceType::Simulator)
}

/// Records the value it finds at the origin, then stamps its own id there.
struct Stamp {
    id: u8,
    seen: Rc<RefCell<Vec<(u8, u8)>>>,
    lifetime: Option<u32>,
}

impl Animation for Stamp {
    fn render(&mut self, frame: &mut Frame) {
        self.seen.borrow_mut().push((self.id, frame.get(0, 0, 0)));
        frame.set(0, 0, 0, self.id);
        if let Some(n) = self.lifetime.as_mut() {
            *n = n.saturating_sub(1);
        }
    }

    fn is_finished(&self) -> bool {
        self.lifetime == Some(0)
    }
}

fn stamp(id: u8, seen: &Rc<RefCell<Vec<(u8, u8)>>>, lifetime: Option<u32>) -> Box<dyn Animation> {
    Box::new(Stamp {
        id,
        seen: Rc::clone(seen),
        lifetime,
    })
}

#[test]
fn rejects_non_positive_transition() {
    assert!(Engine::seeded(fc(), 0.0, 1).is_err());
    assert!(Engine::seeded(fc(), f64::NAN, 1).is_err());
}

#[test]
fn first_frame_performs_a_transition() {
    let mut engine = Engine::seeded(fc(), 60.0, 7).unwrap();
    engine.add_default_animation_types();
    assert!(engine.units(Layer::Default).is_empty());
    engine.next_frame();
    assert_eq!(engine.units(Layer::Default).len(), 1);
    assert!((engine.countdown() - 60.0).abs() < 1e-9);
}

#[test]
fn empty_registry_leaves_default_layer_alone() {
    let mut engine = Engine::seeded(fc(), 1.0, 7).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    engine.add_unit(Layer::Default, None, stamp(9, &seen, None));
    for _ in 0..30 {
        engine.next_frame();
    }
    assert_eq!(engine.units(Layer::Default).len(), 1);
    assert_eq!(seen.borrow().len(), 30);
}

#[test]
fn transitions_never_repeat_immediately() {
    let mut engine = Engine::seeded(fc(), 0.1, 42).unwrap();
    engine.add_animation_type(AnimationKind::PowerOn);
    engine.add_animation_type(AnimationKind::Starfield);
    let mut previous = None;
    for _ in 0..200 {
        let picked = engine.set_random_animation(Layer::Default);
        assert!(picked.is_some());
        assert_ne!(picked, previous);
        previous = picked;
    }
}

#[test]
fn single_registered_kind_may_repeat() {
    let mut engine = Engine::seeded(fc(), 0.1, 1).unwrap();
    engine.add_animation_type(AnimationKind::PowerOn);
    engine.add_animation_type(AnimationKind::PowerOn);
    assert_eq!(engine.registry(), &[AnimationKind::PowerOn]);
    for _ in 0..5 {
        assert_eq!(
            engine.set_random_animation(Layer::Default),
            Some(AnimationKind::PowerOn)
        );
    }
}

#[test]
fn seeded_engines_pick_the_same_sequence() {
    let run = |seed| {
        let mut engine = Engine::seeded(fc(), 0.1, seed).unwrap();
        for kind in AnimationKind::all() {
            engine.add_animation_type(kind);
        }
        (0..20)
            .map(|_| engine.set_random_animation(Layer::Default))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(3), run(3));
}

#[test]
fn layers_compose_background_default_foreground_in_list_order() {
    let mut engine = Engine::seeded(fc(), 60.0, 1).unwrap();
    engine.set_next_transition(1000.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    engine.add_unit(Layer::Foreground, None, stamp(5, &seen, None));
    engine.add_unit(Layer::Background, None, stamp(1, &seen, None));
    engine.add_unit(Layer::Default, None, stamp(3, &seen, None));
    engine.add_unit(Layer::Background, None, stamp(2, &seen, None));

    let frame = engine.next_frame();
    assert_eq!(frame.get(0, 0, 0), 5);
    assert_eq!(*seen.borrow(), vec![(1, 0), (2, 1), (3, 2), (5, 3)]);
}

#[test]
fn finished_units_never_render_again() {
    let mut engine = Engine::seeded(fc(), 60.0, 1).unwrap();
    engine.set_next_transition(1000.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    engine.add_unit(Layer::Foreground, None, stamp(7, &seen, Some(3)));

    for _ in 0..10 {
        engine.next_frame();
    }
    assert_eq!(seen.borrow().len(), 3);
    assert!(engine.units(Layer::Foreground).is_empty());
}

#[test]
fn flash_overlay_fades_and_is_removed() {
    let mut engine = Engine::seeded(fc(), 60.0, 1).unwrap();
    engine.set_next_transition(1000.0);
    let params = serde_json::json!({ "duration": 0.3 })
        .as_object()
        .cloned()
        .unwrap();
    engine.add_animation(AnimationKind::Flash, Layer::Foreground, &params);

    let levels: Vec<u8> = (0..5).map(|_| engine.next_frame().get(4, 4, 4)).collect();
    assert_eq!(levels, vec![255, 170, 85, 0, 0]);
    assert!(engine.units(Layer::Foreground).is_empty());
}

#[test]
fn every_frame_is_a_full_grid() {
    let mut engine = Engine::seeded(fc(), 0.5, 11).unwrap();
    for kind in AnimationKind::all() {
        engine.add_animation_type(kind);
    }
    for _ in 0..100 {
        let frame = engine.next_frame();
        assert_eq!(frame.as_bytes().len(), 512);
    }
}

#[test]
fn layer_names_parse() {
    assert_eq!("Foreground".parse::<Layer>().unwrap(), Layer::Foreground);
    assert!("middle".parse::<Layer>().is_err());
}
