use super::*;

#[test]
fn load_lifecycle() {
    let mut store = ImageStore::new();
    assert!(matches!(store.source(ImageRole::Primary), SourceStatus::Missing));

    store.begin_load(ImageRole::Primary);
    assert!(matches!(store.source(ImageRole::Primary), SourceStatus::Pending));
    assert!(store.source(ImageRole::Primary).ready().is_none());

    store
        .finish_load(ImageRole::Primary, RgbaImage::new(3, 2))
        .unwrap();
    let ready = store.source(ImageRole::Primary);
    assert_eq!(ready.ready().unwrap().dimensions(), (3, 2));
    assert!(matches!(store.source(ImageRole::Dependent), SourceStatus::Missing));

    store.begin_load(ImageRole::Dependent);
    store.fail_load(ImageRole::Dependent);
    assert!(matches!(store.source(ImageRole::Dependent), SourceStatus::Missing));

    assert!(store.remove(ImageRole::Primary).is_some());
    assert!(store.remove(ImageRole::Primary).is_none());
}

#[test]
fn zero_sized_sources_are_rejected() {
    let mut store = ImageStore::new();
    let err = store.insert(ImageRole::Dependent, RgbaImage::new(0, 4)).unwrap_err();
    assert!(matches!(err, CropError::Image(_)));
}
