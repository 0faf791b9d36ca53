use indicatif::{ProgressBar, ProgressStyle};
use seamless_texture::{PipelineProgress, Stage};
use std::time::Duration;

/// Spinner shown while the pipeline runs, most of the time is spent waiting
/// on the inpainting service so there is no meaningful percentage to show
pub struct ProgressSpinner {
    spinner: ProgressBar,
    stage_num: u32,
}

impl ProgressSpinner {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();

        let sty = ProgressStyle::with_template("[{elapsed_precise}] {spinner:.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(sty);

        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            spinner,
            stage_num: 0,
        }
    }
}

impl Drop for ProgressSpinner {
    fn drop(&mut self) {
        self.spinner.finish();
    }
}

impl PipelineProgress for ProgressSpinner {
    fn update(&mut self, stage: Stage) {
        self.stage_num += 1;
        self.spinner
            .set_message(format!("stage {}/3: {}", self.stage_num, stage));
    }
}
