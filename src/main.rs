use anyhow::Result;
use console::Term;
use screenshot_sorter::config::types::Config;
use screenshot_sorter::init;
use screenshot_sorter::menu::run_main_loop;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();

    // Load config and set locale
    let mut config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    run_main_loop(&term, &mut config)
}
