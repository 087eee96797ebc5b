use livesketch::{Attributes, BoxShape, Circle, ErrorKind, GeomError, Group, Shape, UnionBox};

fn assert_corners(group: &Group, corners: &[(&str, (f64, f64))]) -> Result<(), GeomError> {
    for &(key, (x, y)) in corners {
        let p = &group.points()[key];
        assert!(p.is_at(x, y)?, "{key} is {p}, expected ({x},{y})");
    }
    Ok(())
}

#[test]
fn group_of_two_circles_follows_its_members() -> Result<(), GeomError> {
    let c1 = Circle::new((0.0, 0.0), 1)?;
    let c2 = Circle::new((2.0, 0.0), 1)?;
    let group = Group::of([c1.clone(), c2.clone()])?;

    let bbox = group.boundingbox();
    assert_eq!(bbox.get_width()?, 4.0);
    assert_eq!(bbox.get_height()?, 2.0);
    assert_corners(
        &group,
        &[
            ("ll", (-1.0, -1.0)),
            ("lr", (3.0, -1.0)),
            ("ul", (-1.0, 1.0)),
            ("ur", (3.0, 1.0)),
        ],
    )?;

    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (2.0, -1.0)] {
        assert!(group.hittest(x, y)?, "({x},{y}) should hit");
    }
    for (x, y) in [(1.0, 1.0), (3.0, 1.0), (-1.0, -1.0), (4.0, 0.0)] {
        assert!(!group.hittest(x, y)?, "({x},{y}) should miss");
    }

    c2.center().move_to(2.0, 2.0)?;

    assert_eq!(bbox.get_width()?, 4.0);
    assert_eq!(bbox.get_height()?, 4.0);
    assert_corners(
        &group,
        &[
            ("ll", (-1.0, -1.0)),
            ("lr", (3.0, -1.0)),
            ("ul", (-1.0, 3.0)),
            ("ur", (3.0, 3.0)),
        ],
    )?;
    for (x, y) in [(2.0, 2.0), (3.0, 2.0), (2.0, 3.0), (2.0, 1.0)] {
        assert!(group.hittest(x, y)?, "({x},{y}) should hit");
    }
    for (x, y) in [(2.0, 0.0), (3.0, 3.0), (1.0, 1.0)] {
        assert!(!group.hittest(x, y)?, "({x},{y}) should miss");
    }
    Ok(())
}

#[test]
fn union_box_of_two_circle_bounding_boxes() -> Result<(), GeomError> {
    let c1 = Circle::new((0.0, 0.0), 1)?;
    let c2 = Circle::new((2.0, 0.0), 1)?;
    let union = UnionBox::new([c1.boundingbox(), c2.boundingbox()]);

    assert_eq!(union.as_box().get_width()?, 4.0);
    assert_eq!(union.as_box().get_height()?, 2.0);
    assert!(union.points()["ll"].is_at(-1.0, -1.0)?);
    assert!(union.points()["ur"].is_at(3.0, 1.0)?);
    assert!(union.hittest(1.0, 1.0)?);
    assert!(!union.hittest(3.5, 0.0)?);

    c2.center().move_to(2.0, 2.0)?;
    assert_eq!(union.as_box().get_width()?, 4.0);
    assert_eq!(union.as_box().get_height()?, 4.0);
    assert!(union.points()["ul"].is_at(-1.0, 3.0)?);
    assert!(union.points()["lr"].is_at(3.0, -1.0)?);
    Ok(())
}

#[test]
fn union_box_grows_with_added_members() -> Result<(), GeomError> {
    let a = BoxShape::from_corners(0, (1.0, 1.0))?;
    let b = BoxShape::from_corners((4.0, -2.0), (5.0, 0.0))?;
    let union = UnionBox::new([&a]);
    assert_eq!(union.as_box().get_area()?, 1.0);

    union.add(&b);
    assert_eq!(union.len(), 2);
    assert!(union.points()["ll"].is_at(0.0, -2.0)?);
    assert!(union.points()["ur"].is_at(5.0, 1.0)?);
    assert!(union.points()["center"].is_at(2.5, -0.5)?);
    Ok(())
}

#[test]
fn empty_union_fails_when_evaluated() -> Result<(), GeomError> {
    let union = UnionBox::empty();
    assert!(union.is_empty());
    let err = union.points()["ll"].coords().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyUnion);

    union.add(&BoxShape::from_corners(0, (2.0, 2.0))?);
    assert!(union.points()["ll"].is_at(0.0, 0.0)?);
    Ok(())
}

#[test]
fn cloned_group_does_not_share_later_children() -> Result<(), GeomError> {
    let mut group = Group::of([Circle::new(0, 1)?])?;
    let copy = group.clone();
    group.add(Circle::new((10.0, 0.0), 1)?)?;

    assert_eq!(group.len(), 2);
    assert_eq!(copy.len(), 1);
    assert_eq!(group.boundingbox().get_width()?, 12.0);
    assert_eq!(copy.boundingbox().get_width()?, 2.0);
    Ok(())
}

#[test]
fn nested_translated_groups() -> Result<(), GeomError> {
    let c = Circle::new(0, 1)?;
    let inner = Group::translation(2, 0, [c.clone()])?;
    let outer = Group::translation(0, 3, [inner])?;

    assert!(outer.points()["center"].is_at(2.0, 3.0)?);
    assert!(outer.hittest(2.0, 3.5)?);
    assert!(!outer.hittest(0.0, 0.0)?);

    c.center().move_by(1.0, 1.0)?;
    assert!(outer.points()["ll"].is_at(2.0, 3.0)?);
    Ok(())
}
