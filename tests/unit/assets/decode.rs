use super::*;

#[test]
fn png_bytes_decode_to_straight_alpha() {
    let img = RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
    let png = encode_png(&img).unwrap();

    let decoded = decode_image(&png).unwrap();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [100, 50, 200, 128]);
    assert_eq!(decoded.get_pixel(1, 0).0, [1, 2, 3, 255]);
}

#[test]
fn garbage_bytes_are_an_error() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn missing_file_reports_path() {
    let err = open_image(Path::new("/definitely/not/here.png")).unwrap_err();
    assert!(err.to_string().contains("here.png"));
}
