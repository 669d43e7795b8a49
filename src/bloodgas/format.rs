/// 반올림 판단에 쓰는 소수 자릿수. f64의 정확한 십진 전개를 충분히 담는다.
const EXACT_DIGITS: usize = 40;

/// 값을 소수점 `decimals` 자리 고정 문자열로 만든다.
///
/// - 반올림은 이진 값 그대로의 십진 전개 기준, 절반은 0에서 먼 쪽으로 올린다(2.5 → "3").
/// - 음의 0은 부호 없이 출력한다("0.0").
/// - NaN은 "NaN", 무한대는 "Infinity"/"-Infinity".
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    let negative = value < 0.0;
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();
    let round_up = frac_part
        .as_bytes()
        .get(decimals)
        .is_some_and(|b| *b >= b'5');
    if round_up {
        carry_one(&mut digits);
    }

    let int_len = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    for (i, d) in digits.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(char::from(b'0' + d));
    }
    out
}

fn carry_one(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}
