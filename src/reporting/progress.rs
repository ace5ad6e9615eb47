use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Bar on stderr for a batch of candidates or test cases. Hidden when quiet.
pub fn batch_progress(quiet: bool, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(0);
    if quiet {
        bar.set_draw_target(ProgressDrawTarget::hidden());
        return bar;
    }
    let style = ProgressStyle::default_bar()
        .template("  {bar:30.cyan/dark_gray} {pos}/{len} | {msg}")
        .map(|s| s.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar
}
