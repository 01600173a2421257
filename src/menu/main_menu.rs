use crate::config::save::save_settings;
use crate::config::types::{Config, Corner, Language, ParserScheme, parse_opacity};
use crate::menu::handlers::run_screenshot_sorter;
use crate::tools::is_supported_image;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::{info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// 主選單迴圈，直到使用者離開或發生錯誤
pub fn run_main_loop(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        match show_main_menu(term, config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}

pub fn show_main_menu(term: &Term, config: &mut Config) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_sort"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_screenshot_sorter(term, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_watermark"),
            t!("settings.opt_scheme"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_watermark_menu(term, config)?,
            Some(1) => show_scheme_menu(term, config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 浮水印設定選單
fn show_watermark_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.watermark.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let watermark = &config.settings.watermark;
        let state = if watermark.enabled {
            t!("settings.watermark.enabled")
        } else {
            t!("settings.watermark.disabled")
        };
        let image = watermark.image_path.as_ref().map_or_else(
            || t!("settings.watermark.none").to_string(),
            |p| p.display().to_string(),
        );

        let options = vec![
            t!("settings.watermark.opt_toggle", state = state),
            t!("settings.watermark.opt_image", path = image),
            t!("settings.watermark.opt_corner", corner = watermark.corner),
            t!(
                "settings.watermark.opt_opacity",
                opacity = watermark.effective_opacity()
            ),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let watermark = &mut config.settings.watermark;
        match selection {
            Some(0) => watermark.enabled = !watermark.enabled,
            Some(1) => {
                let path: String = Input::new()
                    .with_prompt(t!("settings.watermark.image_prompt"))
                    .validate_with(|input: &String| -> std::result::Result<(), String> {
                        let path = Path::new(input.trim());
                        if path.is_file() && is_supported_image(path) {
                            Ok(())
                        } else {
                            Err(t!("settings.watermark.image_invalid").to_string())
                        }
                    })
                    .interact_text()?;
                watermark.image_path = Some(PathBuf::from(path.trim()));
            }
            Some(2) => {
                let corners = Corner::all();
                let items: Vec<String> = corners.iter().map(ToString::to_string).collect();
                let default_index = corners
                    .iter()
                    .position(|&c| c == watermark.corner)
                    .unwrap_or(0);

                let Some(idx) = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt(t!("settings.watermark.corner_prompt"))
                    .items(&items)
                    .default(default_index)
                    .interact_on_opt(term)?
                else {
                    continue;
                };
                watermark.corner = corners[idx];
            }
            Some(3) => {
                let input: String = Input::new()
                    .with_prompt(t!("settings.watermark.opacity_prompt"))
                    .default(watermark.effective_opacity().to_string())
                    .interact_text()?;
                watermark.opacity_percent = parse_opacity(&input);
            }
            Some(4) | None => break,
            _ => unreachable!(),
        }

        save_settings(&config.settings)?;
    }

    Ok(())
}

/// 檔名規則選單
fn show_scheme_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.scheme.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!(
        "\n{} {}\n",
        style(t!("settings.current")).dim(),
        config.settings.parser_scheme
    );

    let schemes = [ParserScheme::Primary, ParserScheme::Legacy];
    let items: Vec<String> = vec![
        t!("settings.scheme.primary").to_string(),
        t!("settings.scheme.legacy").to_string(),
    ];

    let default_index = schemes
        .iter()
        .position(|&s| s == config.settings.parser_scheme)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.scheme.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected = schemes[selection];
    if selected != config.settings.parser_scheme {
        config.settings.parser_scheme = selected;
        save_settings(&config.settings)?;
        println!("\n{} {}", style(t!("settings.saved")).green(), selected);
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::English, Language::TraditionalChinese];
    let items: Vec<&str> = languages.iter().map(Language::display_name).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected = languages[selection];
    if selected != config.settings.language {
        config.settings.language = selected;
        rust_i18n::set_locale(selected.as_str());
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected.display_name()
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
