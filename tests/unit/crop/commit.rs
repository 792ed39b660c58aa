use super::*;

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| image::Rgba([(x % 256) as u8, (y % 256) as u8, 9, 255]))
}

#[test]
fn full_crop_at_zero_rotation_is_lossless() {
    let src = gradient(80, 60);
    let layout = CanvasLayout::fit(80, 60, None);
    let state = CropState::full(layout.bounds(0.0), 0.0);

    let out = CropCommitter::commit(&src, &layout, &state).unwrap();
    assert_eq!(out.image.dimensions(), (80, 60));
    assert_eq!(out.image, src);
    assert_eq!(out.descriptor.normalized_width, 1.0);
    assert_eq!((out.settings.width, out.settings.height), (80.0, 60.0));
}

#[test]
fn scaled_canvas_maps_back_to_source_pixels() {
    let src = gradient(200, 100);
    let layout = CanvasLayout::with_scale(200, 100, 0.5);
    let b = layout.bounds(0.0);
    let mut state = CropState::full(b, 0.0);
    state.crop_rect = CropRect::new(b.x + 10.0, b.y + 5.0, 40.0, 20.0);

    let out = CropCommitter::commit(&src, &layout, &state).unwrap();
    assert_eq!(
        out.source_rect,
        PixelRect {
            x: 20,
            y: 10,
            width: 80,
            height: 40
        }
    );
    assert_eq!(out.image.dimensions(), (80, 40));
    assert_eq!(out.image.get_pixel(0, 0), src.get_pixel(20, 10));
    assert_eq!(out.image.get_pixel(79, 39), src.get_pixel(99, 49));
}

#[test]
fn quarter_turn_swaps_dimensions() {
    let mut src = RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 0, 255]));
    src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    let rotated = render_rotated(&src, 90.0).unwrap();
    assert_eq!(rotated.dimensions(), (2, 4));
    assert_eq!(rotated.get_pixel(1, 0).0, [255, 0, 0, 255]);
    assert_eq!(render_rotated(&src, -270.0).unwrap(), rotated);
    assert_eq!(render_rotated(&src, 180.0).unwrap().get_pixel(3, 1).0, [255, 0, 0, 255]);

    let layout = CanvasLayout::fit(4, 2, None);
    let state = CropState::full(layout.bounds(90.0), 90.0);
    let out = CropCommitter::commit(&src, &layout, &state).unwrap();
    assert_eq!(out.image.dimensions(), (2, 4));
}

#[test]
fn source_rect_never_leaves_the_surface() {
    let bounds = RotatedBounds {
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
    };
    let r = source_crop_rect(
        &CropRect::new(8.0, -3.0, 50.0, f64::NAN),
        &bounds,
        1.0,
        (10.0, 10.0),
        (10, 10),
    );
    assert_eq!(r.x, 8);
    assert_eq!(r.y, 0);
    assert_eq!(r.width, 2);
    assert_eq!(r.height, 1);
}

#[test]
fn close_records_without_pixels() {
    let layout = CanvasLayout::fit(30, 20, None);
    let b = layout.bounds(10.0);
    let mut state = CropState::full(b, 10.0);
    state.crop_rect = CropRect::new(b.x, b.y, b.width / 2.0, b.height);
    let d = CropCommitter::close(&layout, &state);
    assert_eq!(d.rotation, 10.0);
    assert!((d.normalized_width - 0.5).abs() < 1e-12);
    assert!(d.matches_source(30, 20));
}

#[test]
fn recrop_fits_ratio_at_committed_rotation() {
    let src = gradient(100, 100);
    let layout = CanvasLayout::fit(100, 100, None);

    let fresh = CropCommitter::recrop(&src, &layout, 2.0, 0.0, None, 10.0).unwrap();
    assert_eq!(fresh.image.dimensions(), (100, 50));
    assert_eq!(fresh.descriptor.rotation, 0.0);

    let b = layout.bounds(0.0);
    let mut prev = CropCommitter::close(&layout, &CropState::full(b, 0.0));
    prev.normalized_width = 0.5;
    prev.normalized_height = 0.5;
    let out = CropCommitter::recrop(&src, &layout, 1.0, 0.0, Some(&prev), 10.0).unwrap();
    assert_eq!(out.image.dimensions(), (50, 50));
    assert_eq!(out.image.get_pixel(0, 0), src.get_pixel(0, 0));

    let mut foreign = prev;
    foreign.original_width = 7;
    let out = CropCommitter::recrop(&src, &layout, 1.0, 0.0, Some(&foreign), 10.0).unwrap();
    assert_eq!(out.image.dimensions(), (100, 100));

    let turned = CropCommitter::recrop(&src, &layout, 1.0, 90.0, None, 10.0).unwrap();
    assert_eq!(turned.descriptor.rotation, 90.0);
    assert_eq!(turned.settings.rotation, 90.0);
}

#[test]
fn arbitrary_angle_renders_rotated_bounding_box() {
    let src = RgbaImage::from_pixel(40, 20, image::Rgba([200, 10, 10, 255]));
    let rotated = render_rotated(&src, 30.0).unwrap();
    let (rw, rh) = rotated_size(40.0, 20.0, 30.0);
    assert_eq!(rotated.dimensions(), (rw.ceil() as u32, rh.ceil() as u32));
    let (cx, cy) = (rotated.width() / 2, rotated.height() / 2);
    assert!(rotated.get_pixel(cx, cy).0[0] > 190);
    // Corners of the bounding box lie outside the rotated source.
    assert_eq!(rotated.get_pixel(0, 0).0[3], 0);
}

#[test]
fn recrop_ignores_descriptor_from_another_rotation() {
    let src = gradient(100, 100);
    let layout = CanvasLayout::fit(100, 100, None);
    let b = layout.bounds(90.0);
    let mut state = CropState::full(b, 90.0);
    state.crop_rect = CropRect::new(b.x, b.y, b.width / 2.0, b.height / 2.0);
    let turned = CropCommitter::close(&layout, &state);
    assert_eq!(turned.rotation, 90.0);

    let out = CropCommitter::recrop(&src, &layout, 1.0, 0.0, Some(&turned), 10.0).unwrap();
    assert_eq!(out.image.dimensions(), (100, 100));
    assert_eq!(out.descriptor.rotation, 0.0);

    let same = CropCommitter::recrop(&src, &layout, 1.0, 90.0, Some(&turned), 10.0).unwrap();
    assert_eq!(same.image.dimensions(), (50, 50));

    // -180 and 180 are the same frame.
    let mut flipped = turned;
    flipped.rotation = -180.0;
    let out = CropCommitter::recrop(&src, &layout, 1.0, 180.0, Some(&flipped), 10.0).unwrap();
    assert_eq!(out.image.dimensions(), (50, 50));
}
