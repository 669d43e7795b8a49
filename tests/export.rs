use image::{Rgba, RgbaImage};
use istat_simulator::bloodgas::PanelType;
use istat_simulator::export::{
    crop_and_scale, export_file_name, write_artifact, CaptureRect, ExportFormat,
};

fn screenshot() -> RgbaImage {
    // 2 px/pt 화면에서 (10,10)pt 위치에 20x10pt 빨간 패널
    let mut img = RgbaImage::from_pixel(100, 80, Rgba([255, 255, 255, 255]));
    for y in 20..40 {
        for x in 20..60 {
            img.put_pixel(x, y, Rgba([200, 0, 0, 255]));
        }
    }
    img
}

#[test]
fn file_names_follow_panel_and_format() {
    assert_eq!(
        export_file_name(PanelType::Cg8, ExportFormat::Png),
        "istat-cg8-screen.png"
    );
    assert_eq!(
        export_file_name(PanelType::Cg4, ExportFormat::Pdf),
        "istat-cg4-screen.pdf"
    );
}

#[test]
fn png_written_at_double_logical_size() {
    let rect = CaptureRect::new(10.0, 10.0, 20.0, 10.0);
    let panel = crop_and_scale(&screenshot(), rect, 1.0).unwrap();
    assert_eq!(panel.dimensions(), (40, 20));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export_file_name(PanelType::Cg8, ExportFormat::Png));
    write_artifact(&path, ExportFormat::Png, &panel).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (40, 20));
}

#[test]
fn hidpi_capture_is_cropped_without_resampling() {
    let rect = CaptureRect::new(10.0, 10.0, 20.0, 10.0);
    let panel = crop_and_scale(&screenshot(), rect, 2.0).unwrap();
    assert_eq!(panel.dimensions(), (40, 20));
    assert!(panel.pixels().all(|p| p.0 == [200, 0, 0, 255]));
}

#[test]
fn pdf_page_matches_image() {
    let rect = CaptureRect::new(10.0, 10.0, 20.0, 10.0);
    let panel = crop_and_scale(&screenshot(), rect, 2.0).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export_file_name(PanelType::Cg4, ExportFormat::Pdf));
    write_artifact(&path, ExportFormat::Pdf, &panel).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/MediaBox [0 0 53.33 26.67]"));
    assert!(text.contains("/Width 40 /Height 20"));
}

#[test]
fn capture_outside_window_is_skipped() {
    let rect = CaptureRect::new(500.0, 500.0, 20.0, 10.0);
    assert!(crop_and_scale(&screenshot(), rect, 1.0).is_none());
}
