use super::sort_engine::{RunSummary, SortEngine, SortEvent, SortMode, SortRequest};
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, ModeKind};
use crate::tools::validate_directory_exists;
use anyhow::{Context, Result};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// 截圖整理元件
pub struct ScreenshotSorter<'a> {
    config: &'a mut Config,
}

impl<'a> ScreenshotSorter<'a> {
    pub const fn new(config: &'a mut Config) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style(t!("sorter.title")).cyan().bold());
        println!("{}", style(t!("sorter.backup_warning")).red().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let Some(mode_kind) = self.prompt_mode()? else {
            return Ok(());
        };

        let recent_sources = self.config.settings.recent_paths.clone();
        let Some(source) = prompt_path(&recent_sources, &t!("sorter.source_prompt"))? else {
            return Ok(());
        };
        validate_directory_exists(Path::new(&source))?;

        let mode = match mode_kind {
            ModeKind::MoveArchive => SortMode::MoveAndArchive,
            ModeKind::Copy => {
                let recent_destinations = self.config.settings.recent_destinations.clone();
                let Some(destination) =
                    prompt_path(&recent_destinations, &t!("sorter.destination_prompt"))?
                else {
                    return Ok(());
                };
                validate_directory_exists(Path::new(&destination))?;
                SortMode::CopyToDestination(PathBuf::from(destination))
            }
        };

        self.remember_choices(mode_kind, &source, &mode);

        let request = SortRequest::new(PathBuf::from(&source), mode)
            .with_watermark(self.config.settings.watermark.clone())
            .with_scheme(self.config.settings.parser_scheme);
        self.print_request(&request);

        if !confirm_start()? {
            println!("{}", style(t!("sorter.cancelled")).yellow());
            return Ok(());
        }

        let summary = execute(request)?;
        print_summary(&summary);

        Ok(())
    }

    fn prompt_mode(&self) -> Result<Option<ModeKind>> {
        let modes = [ModeKind::MoveArchive, ModeKind::Copy];
        let items = vec![t!("sorter.mode_move"), t!("sorter.mode_copy")];
        let default_index = modes
            .iter()
            .position(|&m| m == self.config.settings.last_mode)
            .unwrap_or(0);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("sorter.mode_prompt"))
            .items(&items)
            .default(default_index)
            .interact_opt()?;

        Ok(selection.map(|idx| modes[idx]))
    }

    /// 更新路徑歷史並儲存
    fn remember_choices(&mut self, mode_kind: ModeKind, source: &str, mode: &SortMode) {
        let settings = &mut self.config.settings;
        settings.last_mode = mode_kind;
        add_recent_path(&mut settings.recent_paths, source);
        if let SortMode::CopyToDestination(destination) = mode {
            add_recent_path(
                &mut settings.recent_destinations,
                &destination.to_string_lossy(),
            );
        }

        if let Err(e) = save_settings(settings) {
            warn!("無法儲存路徑歷史: {e}");
        }
    }

    fn print_request(&self, request: &SortRequest) {
        println!();
        println!(
            "  {} {}",
            style(t!("sorter.label_source")).dim(),
            request.source.display()
        );
        if let SortMode::CopyToDestination(destination) = &request.mode {
            println!(
                "  {} {}",
                style(t!("sorter.label_destination")).dim(),
                destination.display()
            );
        }
        println!(
            "  {} {}",
            style(t!("sorter.label_scheme")).dim(),
            request.scheme
        );

        let watermark = &request.watermark;
        match watermark.active_image() {
            Some(path) => println!(
                "  {} {}",
                style(t!("sorter.label_watermark")).dim(),
                t!(
                    "sorter.watermark_on",
                    path = path.display(),
                    corner = watermark.corner,
                    opacity = watermark.effective_opacity()
                )
            ),
            None => println!(
                "  {} {}",
                style(t!("sorter.label_watermark")).dim(),
                t!("sorter.watermark_off")
            ),
        }
        println!();
    }
}

/// 執行引擎並顯示逐檔進度
fn execute(request: SortRequest) -> Result<RunSummary> {
    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message(t!("sorter.running").to_string());

    let mut engine = SortEngine::new(request);
    let result = engine.run(|event| {
        progress_bar.set_length(event.total as u64);
        progress_bar.set_position(event.index as u64);
        progress_bar.println(format_event(event));
    });

    progress_bar.finish_and_clear();
    let summary = result?;
    info!("截圖整理狀態: {:?}", engine.state());
    Ok(summary)
}

fn format_event(event: &SortEvent) -> String {
    let line = event.to_string();
    if event.outcome.is_placed() && event.outcome.reason().is_none() {
        style(line).green().to_string()
    } else {
        style(line).red().to_string()
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", style(t!("sorter.summary_title")).cyan().bold());

    if summary.total == 0 {
        println!("  {}", style(t!("sorter.no_files")).yellow());
        return;
    }

    println!("  {}: {}", t!("sorter.summary_total"), summary.total);
    println!(
        "  {}: {}",
        t!("sorter.summary_succeeded"),
        style(summary.succeeded).green()
    );
    if summary.skipped > 0 {
        println!(
            "  {}: {}",
            t!("sorter.summary_skipped"),
            style(summary.skipped).yellow()
        );
    }
    if summary.watermark_failed > 0 {
        println!(
            "  {}: {}",
            t!("sorter.summary_watermark_failed"),
            style(summary.watermark_failed).red()
        );
    }
}

fn confirm_start() -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(t!("sorter.confirm"))
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// 讓使用者從歷史路徑中選擇，或輸入新路徑；按 ESC 回傳 `None`
fn prompt_path(recent_paths: &[String], prompt: &str) -> Result<Option<String>> {
    if recent_paths.is_empty() {
        let path: String = Input::new().with_prompt(prompt).interact_text()?;
        return Ok(Some(path.trim().to_string()));
    }

    let mut options: Vec<String> = recent_paths
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let indicator = if Path::new(p).is_dir() { "✓" } else { "✗" };
            format!("{} [{}] {}", i + 1, indicator, p)
        })
        .collect();
    options.push(t!("sorter.new_path").to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&options)
        .default(0)
        .interact_opt()?;

    match selection {
        None => Ok(None),
        Some(idx) if idx < recent_paths.len() => Ok(Some(recent_paths[idx].clone())),
        Some(_) => {
            let path: String = Input::new().with_prompt(prompt).interact_text()?;
            Ok(Some(path.trim().to_string()))
        }
    }
}
