use crate::aggregate::analyze;
use crate::cli::AnalyzeArgs;
use crate::collect::Collector;
use crate::config::{validate_repositories, Config};
use crate::deliver::{transport_from_config, Delivery, DEFAULT_TITLE};
use crate::inspector::Inspector;
use crate::model::AnalysisWindow;
use crate::report::{
    LlmComposer, ReportComposer, ReportDocument, ReportGenerator, TemplateComposer,
};
use crate::util::truncate_chars;
use crate::window::resolve_window;
use anyhow::{bail, Context};
use chrono::Utc;
use console::style;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const PREVIEW_CHARS: usize = 500;

pub fn exec(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(channel) = &args.channel {
        config.slack_channel = channel.clone();
    }

    validate_repositories(&args.repos).context("Invalid repository path")?;

    let composer: Box<dyn ReportComposer> = if args.offline {
        Box::new(TemplateComposer)
    } else {
        let api_key = config.require_llm().context("Language model is not configured")?;
        Box::new(LlmComposer::new(
            &config.openai_base_url,
            api_key,
            &config.llm_model,
            config.http_timeout(),
        ))
    };

    let delivery = if args.dry_run {
        None
    } else {
        config.require_slack().context("Slack is not configured")?;
        let transport = transport_from_config(&config).context("Slack is not configured")?;
        Some(Delivery::new(transport, config.slack_channel.clone()))
    };

    let days = args.days.unwrap_or(config.time_window_days);
    let window = resolve_window(
        args.start_date.as_deref(),
        args.end_date.as_deref(),
        days,
        Utc::now(),
    )
    .context("Failed to resolve analysis window")?;

    print_parameters(&args.repos, &window, &config, args.dry_run);

    let collector = Collector::new(Inspector::new(config.gitinspector_path.clone()), window);
    let repositories = collector.collect_all(&args.repos);

    info!("computing statistics");
    let analysis = analyze(&repositories, window);
    let document = ReportDocument::from_analysis(&analysis);

    info!("generating report");
    let report = ReportGenerator::new(composer).generate(&document);

    if let Some(path) = &args.save_report {
        fs::write(path, &report)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        println!("{} {}", style("Report saved to:").green(), path.display());
    }

    match delivery {
        Some(delivery) => {
            if !delivery.send_report(&report, DEFAULT_TITLE) {
                bail!("Failed to send report to Slack channel {}", delivery.channel());
            }
            println!(
                "{} {}",
                style("Report sent to Slack channel").green(),
                delivery.channel()
            );
        }
        None => {
            println!("{}", style("Dry run: report not sent to Slack").yellow());
            println!("\n{}", style("Report preview:").bold());
            println!("{}", preview(&report));
        }
    }

    Ok(())
}

fn preview(report: &str) -> String {
    if report.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(report, PREVIEW_CHARS))
    } else {
        report.to_string()
    }
}

fn print_parameters(repos: &[PathBuf], window: &AnalysisWindow, config: &Config, dry_run: bool) {
    println!("{}", style("Analysis parameters").bold());
    println!("{:<14} {}", "Repositories", repos.len());
    println!(
        "{:<14} {} to {}",
        "Time window",
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d")
    );
    println!("{:<14} {} days", "Duration", window.duration_days());
    println!("{:<14} {}", "Slack channel", config.slack_channel);
    println!("{:<14} {}", "Dry run", if dry_run { "yes" } else { "no" });
    println!();
}
