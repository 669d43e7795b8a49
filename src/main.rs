use clap::Parser;
use istat_simulator::{app, cli::Args, config, i18n, view_state::ViewState};

/// CLI 엔트리 포인트. 설정을 로드한 뒤 메뉴 루프를 실행한다.
fn main() {
    let args = Args::parse();
    args.init_logging();
    if let Err(err) = try_run(&args) {
        let tr = i18n::Translator::new(&i18n::resolve_language(&args.lang, None));
        eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
        std::process::exit(1);
    }
}

fn try_run(args: &Args) -> Result<(), app::AppError> {
    let cfg = config::load_or_default()?;
    let lang = i18n::resolve_language(&args.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    log::debug!("language resolved: {}", tr.language_code());

    let mut state = ViewState::new(cfg.default_panel);
    args.apply_to(&mut state);
    app::run(&mut state, &tr)
}
