use crate::component::ScreenshotSorter;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;

pub fn run_screenshot_sorter(term: &Term, config: &mut Config) -> Result<()> {
    let mut sorter = ScreenshotSorter::new(config);

    if let Err(e) = sorter.run() {
        eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
