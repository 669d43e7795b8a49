//! 캡처 이미지 한 장을 채운 단일 페이지 PDF 작성기.
//!
//! 페이지 크기는 이미지 픽셀 수에 [`PT_PER_PX`]를 곱한 값이다.
//! 이미지 스트림은 PNG 인코더가 만든 zlib 데이터(IDAT)를 그대로 담고
//! `/FlateDecode` + PNG 예측자(`/Predictor 15`)로 선언한다.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, RgbaImage};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::ExportError;

/// 픽셀 → PDF 포인트 환산 계수. 1 px = 96/72 pt (px 단위 PDF의 기본 환산).
pub const PT_PER_PX: f64 = 96.0 / 72.0;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// 알파를 흰 배경에 합성한 RGB 바이트.
fn flatten_on_white(image: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for px in image.pixels() {
        let [r, g, b, a] = px.0;
        let a = u16::from(a);
        for c in [r, g, b] {
            let blended = (u16::from(c) * a + 255 * (255 - a) + 127) / 255;
            out.push(blended as u8);
        }
    }
    out
}

/// PNG 파일에서 IDAT 청크 내용을 이어 붙인다. 구조가 깨졌거나 IDAT가 없으면 None.
fn idat_stream(png: &[u8]) -> Option<Vec<u8>> {
    let mut rest = png.strip_prefix(PNG_SIGNATURE.as_slice())?;
    let mut out = Vec::new();
    while !rest.is_empty() {
        let len = u32::from_be_bytes(rest.get(0..4)?.try_into().ok()?) as usize;
        let kind = rest.get(4..8)?;
        let data = rest.get(8..8 + len)?;
        match kind {
            b"IDAT" => out.extend_from_slice(data),
            b"IEND" => break,
            _ => {}
        }
        // 길이 + 종류 + 데이터 + CRC
        rest = rest.get(12 + len..)?;
    }
    (!out.is_empty()).then_some(out)
}

/// 흰 배경 RGB로 합성한 뒤 PNG 예측자가 붙은 zlib 스트림으로 압축한다.
fn deflate_rgb(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let (w, h) = image.dimensions();
    let rgb = flatten_on_white(image);
    let mut png = Vec::new();
    PngEncoder::new_with_quality(&mut png, CompressionType::Best, FilterType::Adaptive)
        .write_image(&rgb, w, h, ColorType::Rgb8)?;
    idat_stream(&png).ok_or(ExportError::MissingImageData)
}

/// 이미지를 PDF 바이트로 인코딩한다.
pub fn encode_pdf(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(ExportError::EmptyCapture);
    }
    let page_w = f64::from(w) * PT_PER_PX;
    let page_h = f64::from(h) * PT_PER_PX;
    let pixels = deflate_rgb(image)?;
    let content = format!("q\n{page_w:.2} 0 0 {page_h:.2} 0 0 cm\n/Im0 Do\nQ\n");

    let mut buf: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::with_capacity(5);
    buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets.push(buf.len());
    buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(buf.len());
    buf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets.push(buf.len());
    write!(
        buf,
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_w:.2} {page_h:.2}] \
         /Resources << /XObject << /Im0 5 0 R >> >> /Contents 4 0 R >>\nendobj\n"
    )?;

    offsets.push(buf.len());
    write!(buf, "4 0 obj\n<< /Length {} >>\nstream\n", content.len())?;
    buf.extend_from_slice(content.as_bytes());
    buf.extend_from_slice(b"endstream\nendobj\n");

    offsets.push(buf.len());
    write!(
        buf,
        "5 0 obj\n<< /Type /XObject /Subtype /Image /Width {w} /Height {h} \
         /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode \
         /DecodeParms << /Predictor 15 /Colors 3 /BitsPerComponent 8 /Columns {w} >> \
         /Length {} >>\nstream\n",
        pixels.len()
    )?;
    buf.extend_from_slice(&pixels);
    buf.extend_from_slice(b"\nendstream\nendobj\n");

    let xref_at = buf.len();
    write!(buf, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1)?;
    for off in &offsets {
        write!(buf, "{off:010} 00000 n \n")?;
    }
    write!(
        buf,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        offsets.len() + 1
    )?;
    Ok(buf)
}

pub fn write_pdf(path: &Path, image: &RgbaImage) -> Result<(), ExportError> {
    let bytes = encode_pdf(image)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0, 0, 0, 0]);
        out
    }

    #[test]
    fn page_is_image_size_in_px() {
        let img = RgbaImage::from_pixel(400, 200, Rgba([10, 20, 30, 255]));
        let bytes = encode_pdf(&img).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.contains("/MediaBox [0 0 533.33 266.67]"));
        assert!(text.contains("/Width 400 /Height 200"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn image_stream_is_compressed() {
        let img = RgbaImage::from_pixel(400, 200, Rgba([255, 255, 255, 255]));
        let bytes = encode_pdf(&img).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(text.contains("/Predictor 15 /Colors 3 /BitsPerComponent 8 /Columns 400"));
        // 원본 RGB는 240000바이트
        assert!(bytes.len() < 400 * 200 * 3 / 10);
    }

    #[test]
    fn stream_length_matches_idat() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let pixels = deflate_rgb(&img).unwrap();
        let bytes = encode_pdf(&img).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(&format!("/Length {} >>\nstream\n", pixels.len())));
        assert!(bytes.windows(pixels.len()).any(|w| w == pixels.as_slice()));
        // zlib 헤더
        assert_eq!(pixels[0] & 0x0f, 8);
    }

    #[test]
    fn idat_chunks_are_concatenated() {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend(chunk(b"IHDR", &[0; 13]));
        png.extend(chunk(b"IDAT", b"abc"));
        png.extend(chunk(b"IDAT", b"de"));
        png.extend(chunk(b"IEND", b""));
        assert_eq!(idat_stream(&png), Some(b"abcde".to_vec()));

        assert_eq!(idat_stream(b"not a png"), None);
        let mut truncated = PNG_SIGNATURE.to_vec();
        truncated.extend_from_slice(&[0, 0, 0, 9, b'I', b'D', b'A', b'T', 1]);
        assert_eq!(idat_stream(&truncated), None);
    }

    #[test]
    fn xref_points_at_objects() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let bytes = encode_pdf(&img).unwrap();
        let xref = bytes.windows(5).position(|w| w == b"xref\n").unwrap();
        let header = b"xref\n0 6\n0000000000 65535 f \n";
        assert!(bytes[xref..].starts_with(header));
        let entry = &bytes[xref + header.len()..][..10];
        let offset: usize = std::str::from_utf8(entry).unwrap().parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        assert_eq!(flatten_on_white(&img), vec![255, 255, 255]);
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbaImage::new(0, 0);
        assert!(matches!(encode_pdf(&img), Err(ExportError::EmptyCapture)));
    }
}
