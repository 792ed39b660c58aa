use super::*;

#[test]
fn thirds_split_rect_evenly() {
    let rect = CropRect::new(0.0, 0.0, 90.0, 60.0);
    let lines = grid_lines(&rect, GridType::Thirds);
    assert_eq!(lines.len(), 4);
    assert!((lines[0].p0.x - 30.0).abs() < 1e-9);
    assert!((lines[1].p0.x - 60.0).abs() < 1e-9);
    assert!((lines[2].p0.y - 20.0).abs() < 1e-9);
    assert!((lines[3].p1.x - 90.0).abs() < 1e-9);
}

#[test]
fn golden_lines_are_symmetric() {
    let rect = CropRect::new(10.0, 0.0, 100.0, 100.0);
    let lines = grid_lines(&rect, GridType::Golden);
    let left = lines[0].p0.x - rect.x;
    let right = rect.right() - lines[1].p0.x;
    assert!((left - right).abs() < 1e-9);
    assert!((left - 38.196_601).abs() < 1e-5);
}

#[test]
fn grid_and_diagonal_counts() {
    let rect = CropRect::new(0.0, 0.0, 40.0, 40.0);
    assert!(grid_lines(&rect, GridType::None).is_empty());
    assert_eq!(grid_lines(&rect, GridType::Grid).len(), 6);
    let diag = grid_lines(&rect, GridType::Diagonal);
    assert_eq!(diag.len(), 2);
    assert_eq!(diag[0].p1, Point::new(40.0, 40.0));
}

#[test]
fn tokens_round_trip() {
    for g in [
        GridType::None,
        GridType::Thirds,
        GridType::Golden,
        GridType::Grid,
        GridType::Diagonal,
    ] {
        assert_eq!(g.as_str().parse::<GridType>().unwrap(), g);
    }
    assert!("spiral".parse::<GridType>().is_err());
}
