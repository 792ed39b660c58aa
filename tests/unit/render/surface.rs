use super::*;

fn checker(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x * 10) as u8, (y * 10) as u8, 7, 255])
    })
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tol)
}

#[test]
fn zero_sized_surface_is_a_surface_error() {
    assert!(matches!(CpuSurface::new(0, 10), Err(CropError::Surface(_))));
    assert!(matches!(
        CpuSurface::new(1 << 16, 1 << 16),
        Err(CropError::Surface(_))
    ));
    assert!(matches!(
        CpuSurface::new(70_000, 2),
        Err(CropError::Surface(_))
    ));
    assert_eq!(CpuSurface::new(3, 2).unwrap().size(), (3, 2));
}

#[test]
fn premultiplied_pixels_come_back_straight() {
    let mut out = RgbaImage::new(2, 1);
    unpremultiply_into(&[64, 32, 0, 128, 9, 9, 9, 0], &mut out);
    assert!(close(out.get_pixel(0, 0).0, [128, 64, 0, 128], 1));
    assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(premul_rgba8(200, 100, 50, 255), [200, 100, 50, 255]);
}

#[test]
fn draw_image_copies_sub_region_one_to_one() {
    let src = checker(8, 8);
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.draw_image(
        &src,
        CropRect::new(2.0, 3.0, 4.0, 4.0),
        CropRect::new(0.0, 0.0, 4.0, 4.0),
    )
    .unwrap();
    let img = s.finish();
    for y in 0..4 {
        for x in 0..4 {
            assert!(close(img.get_pixel(x, y).0, src.get_pixel(x + 2, y + 3).0, 1));
        }
    }
}

#[test]
fn draw_image_scales_down() {
    let src = checker(8, 8);
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.draw_image(
        &src,
        CropRect::new(0.0, 0.0, 8.0, 8.0),
        CropRect::new(0.0, 0.0, 4.0, 4.0),
    )
    .unwrap();
    let px = s.finish().get_pixel(1, 1).0;
    // Sampled between source pixels 2 and 3 on both axes.
    assert!((20..=30).contains(&px[0]), "{px:?}");
    assert!((20..=30).contains(&px[1]), "{px:?}");
    assert!(px[3] >= 254);
}

#[test]
fn transformed_translation_keeps_pixels() {
    let src = checker(5, 4);
    let mut s = CpuSurface::new(9, 8).unwrap();
    s.draw_image_transformed(&src, Affine::translate((2.0, 3.0)))
        .unwrap();
    let img = s.finish();
    assert!(close(img.get_pixel(2, 3).0, src.get_pixel(0, 0).0, 1));
    assert!(close(img.get_pixel(6, 6).0, src.get_pixel(4, 3).0, 1));
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(8, 7).0[3], 0);
}

#[test]
fn transformed_quarter_turn_moves_corners() {
    let mut src = RgbaImage::new(4, 2);
    src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    let mut s = CpuSurface::new(2, 4).unwrap();
    // Rotate 90° clockwise about the source centre, then centre on the surface.
    let xf = Affine::translate((1.0, 2.0))
        * Affine::rotate(std::f64::consts::FRAC_PI_2)
        * Affine::translate((-2.0, -1.0));
    s.draw_image_transformed(&src, xf).unwrap();
    let px = s.finish().get_pixel(1, 0).0;
    assert!(px[0] > 200 && px[3] > 200, "{px:?}");
}

#[test]
fn degenerate_transform_draws_nothing() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.draw_image_transformed(&checker(2, 2), Affine::scale(0.0))
        .unwrap();
    assert!(s.finish().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn dashed_stroke_leaves_gaps() {
    let count = |s: &mut CpuSurface| s.finish().pixels().filter(|p| p.0[3] > 0).count();

    let mut solid = CpuSurface::new(40, 20).unwrap();
    solid.stroke_rect(CropRect::new(0.0, 0.0, 40.0, 20.0), [255, 255, 255, 255], None);
    let mut dashed = CpuSurface::new(40, 20).unwrap();
    dashed.stroke_rect(
        CropRect::new(0.0, 0.0, 40.0, 20.0),
        [255, 255, 255, 255],
        Some([6.0, 4.0]),
    );

    let solid_count = count(&mut solid);
    assert!(solid_count >= 2 * 40 + 2 * 18, "{solid_count}");
    let dashed_count = count(&mut dashed);
    assert!(dashed_count < solid_count);
    assert!(dashed_count > solid_count / 3);
    assert!(solid.finish().get_pixel(0, 0).0[3] > 200);
    assert_eq!(solid.finish().get_pixel(10, 10).0[3], 0);
}

#[test]
fn fill_rect_clips_and_blends() {
    let mut s = CpuSurface::new(10, 10).unwrap();
    s.clear([0, 0, 0, 255]);
    s.fill_rect(CropRect::new(-5.0, -5.0, 8.0, 8.0), [255, 0, 0, 255]);
    s.fill_rect(CropRect::new(5.0, 5.0, 5.0, 5.0), [255, 255, 255, 128]);
    let img = s.finish();
    assert_eq!(img.get_pixel(2, 2).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(3, 3).0, [0, 0, 0, 255]);
    let half = img.get_pixel(7, 7).0;
    assert_eq!(half[3], 255);
    assert!(half[0].abs_diff(128) <= 2, "{half:?}");
}

#[test]
fn lines_and_labels() {
    let mut s = CpuSurface::new(10, 10).unwrap();
    s.draw_line(
        Line::new(Point::new(0.0, 5.5), Point::new(10.0, 5.5)),
        [0, 255, 0, 255],
    );
    for x in 0..10 {
        let px = s.finish().get_pixel(x, 5).0;
        assert!(px[1] > 200 && px[3] > 200, "{x}: {px:?}");
    }
    assert_eq!(s.finish().get_pixel(4, 2).0[3], 0);

    s.draw_text("locked", Point::new(1.0, 1.0), [10, 10, 10, 200]);
    assert_eq!(s.text_runs().len(), 1);
    assert_eq!(s.text_runs()[0].text, "locked");
    s.clear([0, 0, 0, 0]);
    assert!(s.text_runs().is_empty());
    assert!(s.finish().pixels().all(|p| p.0[3] == 0));
}
