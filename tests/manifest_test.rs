// Manifest loading: YAML and JSON layouts resolved into canvases

use std::fs;

use svg_compose::{load_canvas, CanvasError, Rect};

#[test]
fn test_yaml_manifest_resolves_files_relative_to_manifest() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("art")).unwrap();
    fs::write(
        dir.path().join("art").join("dot.svg"),
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20"><circle cx="10" cy="10" r="8"/></svg>"#,
    )
    .unwrap();
    let manifest = dir.path().join("layout.yaml");
    fs::write(
        &manifest,
        r#"
width: 800
height: 600
background: white
settings:
  baseline_dpi: 96
placements:
  - file: art/dot.svg
    x: 10
    y: 20
    width: 120
    height: 140
  - content: '<svg xmlns="http://www.w3.org/2000/svg" width="12" height="12"><rect width="12" height="12"/></svg>'
    x: 30
    y: 40
    width: 220
    height: 240
"#,
    )
    .unwrap();

    let canvas = load_canvas(&manifest).expect("manifest should load");

    assert_eq!((canvas.width(), canvas.height()), (800.0, 600.0));
    assert_eq!(canvas.background(), "white");
    assert_eq!(canvas.settings().baseline_dpi, 96.0);
    assert_eq!(canvas.placements().len(), 2);
    assert_eq!(canvas.placements()[0].rect(), Rect::new(10.0, 20.0, 120.0, 140.0));
    assert!(canvas.placements()[0].content().contains("<circle"));

    let output = canvas.render_svg().unwrap();
    assert_eq!(output.matches("<g transform=").count(), 2);
    assert!(output.contains("scale(6 7)"));
}

#[test]
fn test_json_manifest_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("layout.json");
    fs::write(
        &manifest,
        r#"{"width": 64, "height": 32, "placements": [{"content": "<svg xmlns=\"http://www.w3.org/2000/svg\"/>"}]}"#,
    )
    .unwrap();

    let canvas = load_canvas(&manifest).unwrap();
    assert_eq!(canvas.background(), "transparent");
    assert_eq!(canvas.placements()[0].rect(), Rect::default());
}

#[test]
fn test_manifest_with_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("layout.yml");
    fs::write(&manifest, "width: 10\nheight: 10\nplacements:\n  - file: nowhere.svg\n").unwrap();

    let err = load_canvas(&manifest).unwrap_err();
    assert!(matches!(err, CanvasError::Io(_)));
}

#[test]
fn test_manifest_rejects_both_sources() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("layout.yaml");
    fs::write(
        &manifest,
        "width: 10\nheight: 10\nplacements:\n  - file: a.svg\n    content: '<svg/>'\n",
    )
    .unwrap();

    let err = load_canvas(&manifest).unwrap_err();
    assert!(matches!(err, CanvasError::Manifest(_)));
}
