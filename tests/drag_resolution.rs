//! Drag gestures resolved against a computed pattern layout

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use grammar2d::layout::{
    check_collision, layout_pattern, DragConstraints, DragEnv, DragGesture, DragMove,
    LayoutConfig, Point,
};
use grammar2d::{load_str, BoundingBox, LocationSpec, Placement, Size, SourceFormat};

#[test]
fn test_collision_is_symmetric() {
    let boxes = [
        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        BoundingBox::new(10.0, 0.0, 10.0, 10.0),
        BoundingBox::new(0.0, 10.0, 10.0, 10.0),
        BoundingBox::new(5.0, 5.0, 10.0, 10.0),
        BoundingBox::new(-5.0, -5.0, 30.0, 30.0),
        BoundingBox::new(2.0, 2.0, 0.0, 0.0),
    ];
    for a in &boxes {
        for b in &boxes {
            assert_eq!(check_collision(a, b), check_collision(b, a), "{:?} {:?}", a, b);
        }
    }
}

#[test]
fn test_touching_edges_do_not_collide() {
    let a = BoundingBox::new(0.0, 0.0, 40.0, 40.0);
    let b = BoundingBox::new(a.x + a.width, 0.0, 40.0, 40.0);
    assert!(!check_collision(&a, &b));
}

const SOURCE: &str = r#"
cell: {}
page:
  inner:
    side: {pattern: cell, location: {left: 0}}
    free: {pattern: cell}
    blocker: {pattern: cell, location: {right: 0, top: 0}}
  outer:
    tag: {pattern: cell, location: {top: 1}}
"#;

fn setup() -> grammar2d::PatternLayout {
    let dict = load_str(SOURCE, SourceFormat::Yaml).unwrap();
    layout_pattern(
        &dict,
        "page",
        Size::new(600.0, 600.0),
        &LayoutConfig::default(),
    )
    .unwrap()
}

fn gesture(layout: &grammar2d::PatternLayout, placement: Placement, name: &str) -> DragGesture {
    let dict = load_str(SOURCE, SourceFormat::Yaml).unwrap();
    let cref = &dict.get("page").unwrap().components(placement)[name];
    let constraints = DragConstraints::from_location(&cref.location, placement);
    let start = layout.get(placement, name).unwrap().bounds;
    DragGesture::begin(name, start, constraints)
}

#[test]
fn test_left_pinned_child_slides_vertically_only() {
    let layout = setup();
    let siblings = layout.siblings(Placement::Inner);
    let env = DragEnv {
        parent: layout.parent,
        surface: layout.stage,
        siblings: &siblings,
    };

    let mut drag = gesture(&layout, Placement::Inner, "side");
    let start = drag.current();
    drag.drag_to(Point::new(start.x + 120.0, 420.0), &env);
    let end = drag.finish();
    assert_eq!(end.x, start.x);
    assert_eq!(end.y, 420.0);
}

#[test]
fn test_free_child_blocked_by_sibling() {
    let layout = setup();
    let siblings = layout.siblings(Placement::Inner);
    let env = DragEnv {
        parent: layout.parent,
        surface: layout.stage,
        siblings: &siblings,
    };
    let blocker = siblings["blocker"];

    let mut drag = gesture(&layout, Placement::Inner, "free");
    let start = drag.current();
    // Straight onto the blocker in the top-right corner; sliding right alone is clear
    let frame = drag.drag_to(Point::new(blocker.x, blocker.y), &env);
    assert_eq!(frame, DragMove::XOnly);
    assert_eq!(drag.current(), start.moved_to(Point::new(blocker.x, start.y)));

    // From there, moving up into the blocker leaves it in place
    let before = drag.current();
    let frame = drag.drag_to(Point::new(blocker.x, blocker.y + 10.0), &env);
    assert_ne!(frame, DragMove::Full);
    assert_eq!(drag.current(), before);
}

#[test]
fn test_outer_child_cannot_enter_parent() {
    let layout = setup();
    let siblings = layout.siblings(Placement::Outer);
    let env = DragEnv {
        parent: layout.parent,
        surface: layout.stage,
        siblings: &siblings,
    };

    let mut drag = gesture(&layout, Placement::Outer, "tag");
    drag.drag_to(Point::new(200.0, 300.0), &env);
    let end = drag.finish();
    assert_eq!(end.bottom(), layout.parent.y);
    assert!(!check_collision(&end, &layout.parent));
}

const TWINS: &str = r#"
cell: {}
page:
  inner:
    twin: {pattern: cell, location: {left: 0, top: 0}}
    mover: {pattern: cell}
  outer:
    twin: {pattern: cell, location: {left: 0}}
"#;

#[test]
fn test_same_name_in_both_placements() {
    let dict = load_str(TWINS, SourceFormat::Yaml).unwrap();
    let layout = layout_pattern(
        &dict,
        "page",
        Size::new(600.0, 600.0),
        &LayoutConfig::default(),
    )
    .unwrap();
    let inner = layout.siblings(Placement::Inner);
    let outer = layout.siblings(Placement::Outer);
    assert_eq!(inner["twin"], BoundingBox::new(100.0, 100.0, 100.0, 70.0));
    assert_ne!(inner["twin"], outer["twin"]);

    let env = DragEnv {
        parent: layout.parent,
        surface: layout.stage,
        siblings: &inner,
    };
    let start = inner["mover"];
    let mut drag = DragGesture::begin(
        "mover",
        start,
        DragConstraints::from_location(&LocationSpec::new(), Placement::Inner),
    );
    // The inner twin blocks the corner; only the horizontal slide is clear
    let frame = drag.drag_to(Point::new(100.0, 100.0), &env);
    assert_eq!(frame, DragMove::XOnly);
    assert_eq!(drag.finish(), start.moved_to(Point::new(100.0, start.y)));
}

#[test]
fn test_gestures_are_independent() {
    let layout = setup();
    let siblings: BTreeMap<String, BoundingBox> = BTreeMap::new();
    let env = DragEnv {
        parent: layout.parent,
        surface: layout.stage,
        siblings: &siblings,
    };

    let mut first = gesture(&layout, Placement::Inner, "free");
    let mut second = gesture(&layout, Placement::Inner, "free");
    first.drag_to(Point::new(120.0, 120.0), &env);
    assert_eq!(second.current(), layout.get(Placement::Inner, "free").unwrap().bounds);
    second.drag_to(Point::new(300.0, 300.0), &env);
    assert_eq!(first.finish().origin(), Point::new(120.0, 120.0));
    assert_eq!(second.finish().origin(), Point::new(300.0, 300.0));
}
