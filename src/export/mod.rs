//! 판독 패널 내보내기: 캡처 예약, 잘라내기/확대, PNG·PDF 저장.

pub mod pdf;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};
use log::info;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bloodgas::PanelType;

pub use pdf::{encode_pdf, write_pdf};

/// 화면 갱신이 끝나도록 캡처 전에 기다리는 시간.
pub const CAPTURE_DELAY: Duration = Duration::from_millis(100);
/// 논리 크기 대비 캡처 배율.
pub const CAPTURE_SCALE: f32 = 2.0;
/// 스크린샷 요청 후 결과를 기다리는 최대 시간.
pub const SCREENSHOT_TIMEOUT: Duration = Duration::from_secs(2);

/// 내보내기 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Pdf => "PDF",
        }
    }
}

/// 내보내기 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ExportError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 이미지 인코딩 오류
    Image(image::ImageError),
    /// 캡처 영역이 비어 있음
    EmptyCapture,
    /// PNG 인코더 출력에 이미지 데이터(IDAT)가 없음
    MissingImageData,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::Image(e) => write!(f, "image encoding error: {e}"),
            ExportError::EmptyCapture => write!(f, "capture area is empty"),
            ExportError::MissingImageData => write!(f, "encoded image has no pixel data"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        ExportError::Io(value)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(value: image::ImageError) -> Self {
        ExportError::Image(value)
    }
}

/// 산출물 파일 이름: `istat-<패널>-screen.<확장자>`
pub fn export_file_name(panel: PanelType, format: ExportFormat) -> String {
    format!("istat-{}-screen.{}", panel.code(), format.extension())
}

/// 캡처할 화면 영역(논리 좌표, point 단위).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CaptureRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// `inner`가 이 영역 안에 완전히 들어가는지.
    pub fn contains(&self, inner: &CaptureRect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.x + inner.width <= self.x + self.width
            && inner.y + inner.height <= self.y + self.height
    }
}

/// 예약된 내보내기 작업의 다음 할 일.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStep {
    /// 지정 시간만큼 더 기다린다.
    Wait(Duration),
    /// 지금 스크린샷을 요청한다. 작업당 한 번만 나온다.
    Capture,
    /// 요청한 스크린샷 도착을 기다린다.
    AwaitScreenshot,
    /// 스크린샷이 [`SCREENSHOT_TIMEOUT`] 안에 오지 않았다. 작업을 버린다.
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Settling,
    Capturing { since: Instant },
}

/// 내보내기 요청 하나. 요청 시점의 패널/영역을 고정해 둔다.
#[derive(Debug, Clone)]
pub struct ExportJob {
    format: ExportFormat,
    panel: PanelType,
    rect: CaptureRect,
    requested_at: Instant,
    state: JobState,
}

impl ExportJob {
    pub fn new(format: ExportFormat, panel: PanelType, rect: CaptureRect, now: Instant) -> Self {
        Self {
            format,
            panel,
            rect,
            requested_at: now,
            state: JobState::Settling,
        }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn panel(&self) -> PanelType {
        self.panel
    }

    pub fn rect(&self) -> CaptureRect {
        self.rect
    }

    pub fn file_name(&self) -> String {
        export_file_name(self.panel, self.format)
    }

    /// 대기 중 패널이 움직였으면 캡처 영역을 새 위치로 바꾼다.
    pub fn retarget(&mut self, rect: CaptureRect) {
        self.rect = rect;
    }

    /// 현재 시각 기준으로 다음 단계를 정한다.
    pub fn poll(&mut self, now: Instant) -> JobStep {
        match self.state {
            JobState::Settling => {
                let elapsed = now.saturating_duration_since(self.requested_at);
                if elapsed < CAPTURE_DELAY {
                    JobStep::Wait(CAPTURE_DELAY - elapsed)
                } else {
                    self.state = JobState::Capturing { since: now };
                    JobStep::Capture
                }
            }
            JobState::Capturing { since } => {
                if now.saturating_duration_since(since) < SCREENSHOT_TIMEOUT {
                    JobStep::AwaitScreenshot
                } else {
                    JobStep::GiveUp
                }
            }
        }
    }
}

/// 창 전체 스크린샷에서 패널 영역을 잘라 논리 크기의 [`CAPTURE_SCALE`]배로 맞춘다.
///
/// 패널 전체가 스크린샷 안에 있어야 한다. 비었거나 일부라도 밖에 있으면 None.
pub fn crop_and_scale(
    screenshot: &RgbaImage,
    rect: CaptureRect,
    pixels_per_point: f32,
) -> Option<RgbaImage> {
    if rect.is_empty() || !(pixels_per_point > 0.0) {
        return None;
    }
    let (img_w, img_h) = screenshot.dimensions();
    let x0 = (rect.x * pixels_per_point).round();
    let y0 = (rect.y * pixels_per_point).round();
    let x1 = ((rect.x + rect.width) * pixels_per_point).round();
    let y1 = ((rect.y + rect.height) * pixels_per_point).round();
    if x0 < 0.0 || y0 < 0.0 || x1 > img_w as f32 || y1 > img_h as f32 || x0 >= x1 || y0 >= y1 {
        return None;
    }
    let (x0, y0, x1, y1) = (x0 as u32, y0 as u32, x1 as u32, y1 as u32);
    let cropped = imageops::crop_imm(screenshot, x0, y0, x1 - x0, y1 - y0).to_image();

    let target_w = ((rect.width * CAPTURE_SCALE).round() as u32).max(1);
    let target_h = ((rect.height * CAPTURE_SCALE).round() as u32).max(1);
    if cropped.dimensions() == (target_w, target_h) {
        return Some(cropped);
    }
    Some(imageops::resize(
        &cropped,
        target_w,
        target_h,
        FilterType::Triangle,
    ))
}

/// RGBA 이미지를 PNG 바이트로 인코딩한다.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(ExportError::EmptyCapture);
    }
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(image.as_raw(), w, h, ColorType::Rgba8)?;
    Ok(buf)
}

pub fn write_png(path: &Path, image: &RgbaImage) -> Result<(), ExportError> {
    let bytes = encode_png(image)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// 형식에 맞춰 산출물을 저장한다.
pub fn write_artifact(
    path: &Path,
    format: ExportFormat,
    image: &RgbaImage,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Png => write_png(path, image)?,
        ExportFormat::Pdf => write_pdf(path, image)?,
    }
    info!(
        "exported {} ({}x{}) to {}",
        format.label(),
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn job_waits_then_captures_once() {
        let start = Instant::now();
        let rect = CaptureRect::new(0.0, 0.0, 10.0, 10.0);
        let mut job = ExportJob::new(ExportFormat::Png, PanelType::Cg8, rect, start);
        match job.poll(start + Duration::from_millis(40)) {
            JobStep::Wait(rest) => assert_eq!(rest, Duration::from_millis(60)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(job.poll(start + CAPTURE_DELAY), JobStep::Capture);
        assert_eq!(job.poll(start + CAPTURE_DELAY * 5), JobStep::AwaitScreenshot);
    }

    #[test]
    fn job_gives_up_without_screenshot() {
        let start = Instant::now();
        let rect = CaptureRect::new(0.0, 0.0, 10.0, 10.0);
        let mut job = ExportJob::new(ExportFormat::Pdf, PanelType::Cg4, rect, start);
        let captured_at = start + CAPTURE_DELAY;
        assert_eq!(job.poll(captured_at), JobStep::Capture);
        assert_eq!(
            job.poll(captured_at + SCREENSHOT_TIMEOUT - Duration::from_millis(1)),
            JobStep::AwaitScreenshot
        );
        assert_eq!(job.poll(captured_at + SCREENSHOT_TIMEOUT), JobStep::GiveUp);
    }

    #[test]
    fn retarget_moves_capture_area() {
        let start = Instant::now();
        let mut job = ExportJob::new(
            ExportFormat::Png,
            PanelType::Cg8,
            CaptureRect::new(0.0, 300.0, 10.0, 10.0),
            start,
        );
        job.retarget(CaptureRect::new(0.0, 40.0, 10.0, 10.0));
        assert_eq!(job.rect(), CaptureRect::new(0.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn partly_visible_panel_is_not_stretched() {
        let shot = RgbaImage::from_pixel(100, 80, Rgba([200, 0, 0, 255]));
        // 아래로 20px 넘친 패널
        assert!(crop_and_scale(&shot, CaptureRect::new(10.0, 60.0, 40.0, 40.0), 1.0).is_none());
        // 왼쪽으로 넘친 패널
        assert!(crop_and_scale(&shot, CaptureRect::new(-5.0, 0.0, 40.0, 40.0), 1.0).is_none());
        // 배율 2에서는 40pt를 넘는 높이가 넘친다
        assert!(crop_and_scale(&shot, CaptureRect::new(0.0, 0.0, 20.0, 41.0), 2.0).is_none());
        assert!(crop_and_scale(&shot, CaptureRect::new(0.0, 0.0, 20.0, 40.0), 2.0).is_some());
    }

    #[test]
    fn contains_requires_whole_rect() {
        let clip = CaptureRect::new(0.0, 30.0, 100.0, 200.0);
        assert!(clip.contains(&CaptureRect::new(10.0, 30.0, 50.0, 200.0)));
        assert!(!clip.contains(&CaptureRect::new(10.0, 20.0, 50.0, 50.0)));
        assert!(!clip.contains(&CaptureRect::new(60.0, 40.0, 50.0, 50.0)));
    }

    #[test]
    fn crop_outside_is_none() {
        let shot = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        assert!(crop_and_scale(&shot, CaptureRect::new(30.0, 30.0, 5.0, 5.0), 1.0).is_none());
        assert!(crop_and_scale(&shot, CaptureRect::new(0.0, 0.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn crop_scales_to_double_logical_size() {
        let mut shot = RgbaImage::from_pixel(100, 80, Rgba([255, 255, 255, 255]));
        shot.put_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let out = crop_and_scale(&shot, CaptureRect::new(10.0, 10.0, 30.0, 20.0), 1.0).unwrap();
        assert_eq!(out.dimensions(), (60, 40));

        // 이미 2배 해상도로 캡처된 경우 그대로 잘라낸다.
        let out = crop_and_scale(&shot, CaptureRect::new(5.0, 5.0, 20.0, 10.0), 2.0).unwrap();
        assert_eq!(out.dimensions(), (40, 20));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }
}
