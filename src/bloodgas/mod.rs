//! 혈액가스 판독값 시뮬레이션 모듈 모음.
//! 입력 기록, 판독 필드, 패널 종류, 도출 공식으로 구성한다.

pub mod deriver;
pub mod format;
pub mod input;
pub mod panel;
pub mod readout;

pub use deriver::*;
pub use input::*;
pub use panel::*;
pub use readout::*;
