use fabric_engine::{Fabric, Laterality};

/// 10 joints / 10 intervals / 1 face holding a right triangle.
fn triangle() -> Fabric {
    let mut fabric = Fabric::with_capacity(10, 10, 1);
    let a = fabric.create_joint(1, Laterality::Middle, [0.0, 0.0, 0.0]).unwrap();
    let b = fabric.create_joint(2, Laterality::Middle, [1.0, 0.0, 0.0]).unwrap();
    let c = fabric.create_joint(3, Laterality::Middle, [0.0, 1.0, 0.0]).unwrap();
    fabric.create_interval(0, a, b, 0.0).unwrap();
    fabric.create_interval(0, b, c, 0.0).unwrap();
    fabric.create_interval(0, c, a, 0.0).unwrap();
    fabric.create_face(a, b, c).unwrap();
    fabric
}

#[test]
fn zero_ticks_exports_the_structure_as_built() {
    let mut fabric = triangle();
    assert_eq!(fabric.iterate(0), 0);
    assert_eq!(fabric.age(), 0);

    let midpoint = fabric.arena().face_midpoints()[0];
    assert!((midpoint[0] - 1.0 / 3.0).abs() < 1e-6);
    assert!((midpoint[1] - 1.0 / 3.0).abs() < 1e-6);
    assert_eq!(midpoint[2], 0.0);

    let lines = fabric.arena().line_locations();
    for (index, interval) in fabric.intervals().iter().enumerate() {
        assert_eq!(lines[index][0], fabric.joint_location(interval.alpha).unwrap());
        assert_eq!(lines[index][1], fabric.joint_location(interval.omega).unwrap());
    }
}

#[test]
fn trigger_snapshots_the_span_at_trigger_time() {
    let mut fabric = triangle();
    let span = fabric.calculate_span(0).unwrap();
    fabric.trigger_interval(0).unwrap();
    fabric.iterate(1);
    let interval = fabric.interval(0).unwrap();
    assert_eq!(interval.stress, span);
    assert_eq!(interval.phase, 1 + fabric.physics().phase_step);
}

#[test]
fn sixth_face_is_refused_on_a_five_face_fabric() {
    let mut fabric = Fabric::with_capacity(3, 3, 5);
    for tag in 1..=3 {
        fabric.create_joint(tag, Laterality::Middle, [tag as f32, 1.0, 0.0]).unwrap();
    }
    for expected in 0..5 {
        assert_eq!(fabric.create_face(0, 1, 2).unwrap(), expected);
    }
    assert!(fabric.create_face(0, 1, 2).unwrap_err().is_capacity());
    assert_eq!(fabric.face_count(), 5);
}

#[test]
fn triggered_transition_settles_to_ideal_span() {
    let mut fabric = triangle();
    fabric.centralize(2.0, 0.0);
    fabric.set_physics(fabric_engine::Physics::weightless());
    let index = fabric.create_interval(0, 0, 1, 1.5).unwrap();
    fabric.trigger_interval(index).unwrap();
    let mut ticks = 0;
    while fabric.iterate(100) != 0 {
        ticks += 100;
        assert!(ticks < 10_000, "transition never settled");
    }
    // The old edge still holds the pair closer than 1.5, so the settled
    // interval reports live compression instead of its span snapshot.
    let interval = fabric.interval(index).unwrap();
    assert_eq!(interval.phase, 0);
    assert!(interval.stress < 0.0);
}
