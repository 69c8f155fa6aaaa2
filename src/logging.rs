//! tracing 기반 로그 초기화.

use tracing_subscriber::{fmt, EnvFilter};

/// 로그 시스템을 초기화한다.
///
/// `RUST_LOG` 환경 변수로 레벨을 지정하며 기본값은 info 이다.
/// 예: `RUST_LOG=corrosion_toolbox=debug`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 표준 출력은 폼/결과용이므로 로그는 stderr로 보낸다
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 테스트용 로그 초기화. 여러 번 호출해도 안전하다.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
