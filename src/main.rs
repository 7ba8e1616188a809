use sales_insight_service::config::AppConfig;
use sales_insight_service::dev_mode::DevMode;
use sales_insight_service::ingest::load_sales_csv;
use sales_insight_service::insight::render_reports;
use sales_insight_service::logging::{self, init_logger, Stage};
use sales_insight_service::pipeline::run_analysis;
use sales_insight_service::render::{ComponentRenderer, JsonComponentWriter};
use sales_insight_service::verify::{print_summary, verify_coverage};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_logger(
        config.log_level()?,
        config.logging.file.as_deref(),
        config.logging.console_timestamps,
    );

    let series = match config.data.dev_mode_days {
        Some(days) => {
            logging::info(
                Stage::Ingest,
                None,
                &format!("Dev mode: generating {} days of synthetic sales", days),
            );
            DevMode::daily(days as usize).generate()
        }
        None => load_sales_csv(&config.data.file, &config.csv_layout()).inspect_err(|e| {
            logging::error(Stage::Ingest, None, &e.to_string());
        })?,
    };

    if std::env::args().skip(1).any(|arg| arg == "--verify") {
        let report = verify_coverage(&series)?;
        print_summary(&report);
        return Ok(());
    }

    let run = run_analysis(&series, &config.analysis_options())?;

    if config.output.write_components {
        let mut writer = JsonComponentWriter::new(&config.output.components_dir);
        for analysis in &run.analyses {
            if let Some(result) = analysis.decomposition() {
                writer.render(analysis.resolution.spec().title, result)?;
            }
        }
        logging::info(
            Stage::Render,
            None,
            &format!(
                "Wrote {} component files to {}",
                writer.written().len(),
                writer.dir().display()
            ),
        );
    }

    println!("{}", render_reports(&run.reports));
    Ok(())
}
