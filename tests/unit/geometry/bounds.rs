use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn zero_rotation_centres_source_in_canvas() {
    let b = rotated_bounds(1000.0, 500.0, 0.0, 1.0, 1415.0, 1415.0);
    assert!(approx(b.width, 1000.0));
    assert!(approx(b.height, 500.0));
    assert!(approx(b.x, 207.5));
    assert!(approx(b.y, 457.5));
}

#[test]
fn quarter_turn_swaps_dimensions() {
    let b = rotated_bounds(400.0, 200.0, 90.0, 0.5, 500.0, 500.0);
    assert!(approx(b.width, 100.0));
    assert!(approx(b.height, 200.0));
    assert!(approx(b.x, 200.0));
    assert!(approx(b.y, 150.0));
}

#[test]
fn formula_matches_rotated_corner_bbox_for_all_angles() {
    let (w, h) = (640.0, 360.0);
    let side = f64::from(rotation_extent(640, 360));
    for scale in [0.25, 0.5, 1.0, 1.7] {
        let mut deg = -180.0;
        while deg <= 180.0 {
            let b = rotated_bounds(w, h, deg, scale, side, side);
            let bbox = rotated_corners_bbox(w, h, deg, scale, side, side);
            assert!((b.x - bbox.x0).abs() < 1e-6, "x at {deg} / {scale}");
            assert!((b.y - bbox.y0).abs() < 1e-6, "y at {deg} / {scale}");
            assert!((b.width - bbox.width()).abs() < 1e-6);
            assert!((b.height - bbox.height()).abs() < 1e-6);
            deg += 7.5;
        }
    }
}

#[test]
fn rotation_extent_fits_any_rotation() {
    assert_eq!(rotation_extent(1000, 500), 1415);
    assert_eq!(rotation_extent(0, 0), 2);
    let layout = CanvasLayout::fit(1000, 500, None);
    for deg in [0.0, 30.0, 45.0, 90.0, 135.0] {
        let b = layout.bounds(deg);
        assert!(b.x >= -1e-9 && b.y >= -1e-9);
        assert!(b.right() <= f64::from(layout.width) + 1e-9);
        assert!(b.bottom() <= f64::from(layout.height) + 1e-9);
    }
}

#[test]
fn fit_shrinks_to_cap() {
    let layout = CanvasLayout::fit(2000, 1000, Some(800));
    assert_eq!(layout.width, 800);
    assert_eq!(layout.height, 800);
    assert!(approx(layout.scale, 800.0 / 2829.0));

    let uncapped = CanvasLayout::fit(200, 100, Some(800));
    assert_eq!(uncapped.scale, 1.0);
}

#[test]
fn degenerate_inputs_stay_finite() {
    let b = rotated_bounds(f64::NAN, -5.0, f64::INFINITY, 0.0, 10.0, 10.0);
    assert!(b.x.is_finite() && b.y.is_finite());
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 0.0);
}

#[test]
fn layout_transform_agrees_with_bounds() {
    let layout = CanvasLayout::with_scale(300, 200, 0.5);
    let xf = layout.canvas_from_source(30.0);
    let b = layout.bounds(30.0);
    let mut bbox = kurbo::Rect::from_points(xf * Point::ZERO, xf * Point::ZERO);
    for p in [
        Point::new(300.0, 0.0),
        Point::new(300.0, 200.0),
        Point::new(0.0, 200.0),
    ] {
        bbox = bbox.union_pt(xf * p);
    }
    assert!(approx(bbox.x0, b.x));
    assert!(approx(bbox.y0, b.y));
    assert!(approx(bbox.width(), b.width));
}
