use anyhow::Result;
use colored::Colorize;
use flamewar_game::{BatchReport, Exhaustion, RunMetrics};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use crate::stats::{Histogram, MetricSummary};

const HISTOGRAM_WIDTH: usize = 40;

#[derive(Serialize)]
struct JsonReport<'a> {
    report: &'a BatchReport,
    summaries: &'a [MetricSummary],
}

pub fn generate_json_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &BatchReport,
    summaries: &[MetricSummary],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(&JsonReport { report, summaries })?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_csv_report<W: Write + ?Sized>(writer: &mut W, report: &BatchReport) -> Result<()> {
    writeln!(
        writer,
        "run,seed,exhaustion,rounds,max_score,won_goals,burned_goals,won_flamewars,lost_flamewars,email_pile_remaining,reads,sends,idle_actions,interrupts_played,scores"
    )?;
    for run in &report.runs {
        writeln!(writer, "{}", csv_row(run))?;
    }
    Ok(())
}

fn csv_row(run: &RunMetrics) -> String {
    let interrupts: u32 = run.stats.interrupts_played.values().sum();
    let scores: Vec<String> = run.scores.iter().map(ToString::to_string).collect();
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        run.run,
        run.seed,
        run.exhaustion.key(),
        run.rounds,
        run.max_score,
        run.won_goals,
        run.burned_goals,
        run.won_flamewars,
        run.lost_flamewars,
        run.email_pile_remaining,
        run.stats.reads,
        run.stats.sends,
        run.stats.idle_actions,
        interrupts,
        scores.join(";")
    )
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &BatchReport,
    summaries: &[MetricSummary],
) -> Result<()> {
    writeln!(writer, "# Flamewar Balance Report\n")?;

    writeln!(writer, "## Setup\n")?;
    writeln!(writer, "- **Runs**: {}", report.batch.runs)?;
    writeln!(writer, "- **Seed**: {}", report.batch.seed)?;
    writeln!(writer, "- **Players**: {}", report.game.num_players)?;
    writeln!(writer, "- **Active goals**: {}", report.game.num_goals)?;
    writeln!(writer, "- **Hand size**: {}", report.game.hand_size)?;
    writeln!(
        writer,
        "- **Interrupt chance**: {:.2}",
        report.game.interrupt_chance
    )?;
    writeln!(writer, "- **Setup failures**: {}\n", report.setup_failures)?;

    writeln!(writer, "## Exhaustion\n")?;
    writeln!(writer, "| Pile | Games | Share |")?;
    writeln!(writer, "|------|------:|------:|")?;
    for kind in Exhaustion::ALL {
        writeln!(
            writer,
            "| {} | {} | {:.1}% |",
            kind.key(),
            report.exhaustion.get(kind),
            report.exhaustion_rate(kind) * 100.0
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "## Metrics\n")?;
    if report.runs.is_empty() {
        writeln!(writer, "_No games reached the first round._")?;
        return Ok(());
    }
    writeln!(writer, "| Metric | Mean | Std dev | Min | Max |")?;
    writeln!(writer, "|--------|-----:|--------:|----:|----:|")?;
    for summary in summaries {
        writeln!(
            writer,
            "| {} | {:.2} | {:.2} | {} | {} |",
            summary.name, summary.mean, summary.std_dev, summary.min, summary.max
        )?;
    }
    Ok(())
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &BatchReport,
    summaries: &[MetricSummary],
    bins: usize,
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Flamewar Balance Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "===========================".cyan())?;
    writeln!(
        writer,
        "Runs: {} (seed {}), {} players, {} goals up, hand of {}",
        report.batch.runs,
        report.batch.seed,
        report.game.num_players,
        report.game.num_goals,
        report.game.hand_size
    )?;
    if report.setup_failures > 0 {
        writeln!(
            writer,
            "Setup failures: {}",
            report.setup_failures.to_string().red()
        )?;
    }
    writeln!(writer, "Batch time: {total_duration:?}")?;
    writeln!(writer)?;

    writeln!(writer, "{}", "🗂  Games ended by".bright_yellow().bold())?;
    for kind in Exhaustion::ALL {
        let share = format!("{:5.1}%", report.exhaustion_rate(kind) * 100.0);
        writeln!(
            writer,
            "   {:<10} {:>5}  {}",
            kind.key(),
            report.exhaustion.get(kind),
            share.green()
        )?;
    }
    writeln!(writer)?;

    if report.runs.is_empty() {
        writeln!(writer, "No games reached the first round.")?;
        return Ok(());
    }

    writeln!(writer, "{}", "📈 Metrics".bright_yellow().bold())?;
    writeln!(
        writer,
        "   {:<22} {:>8} {:>8} {:>8} {:>8}",
        "metric", "mean", "std", "min", "max"
    )?;
    for summary in summaries {
        writeln!(
            writer,
            "   {:<22} {:>8.2} {:>8.2} {:>8} {:>8}",
            summary.name, summary.mean, summary.std_dev, summary.min, summary.max
        )?;
    }
    writeln!(writer)?;

    for series in report.series() {
        let Some(histogram) = Histogram::from_values(&series.values, bins) else {
            continue;
        };
        writeln!(writer, "{}", series.name.bold())?;
        for line in histogram.render(HISTOGRAM_WIDTH) {
            writeln!(writer, "   {line}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// One line per finished game for `--verbose` output.
pub fn describe_run(run: &RunMetrics) -> String {
    format!(
        "run {:>4} seed {:#018x}: {} pile empty after {} rounds, scores {:?}",
        run.run,
        run.seed,
        run.exhaustion.key(),
        run.rounds,
        run.scores
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize_report;
    use flamewar_game::{BatchConfig, CardCatalog, GameConfig, run_batch};

    fn sample_report() -> BatchReport {
        let catalog = CardCatalog::load_default().unwrap();
        run_batch(&catalog, &GameConfig::default(), &BatchConfig::new(6, 17)).unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_has_one_row_per_run() {
        let report = sample_report();
        let text = render(|w| generate_csv_report(w, &report));
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("run,seed,exhaustion"));
        assert_eq!(lines.len(), report.runs.len() + 1);
        let columns = lines[0].split(',').count();
        assert!(lines[1..].iter().all(|line| line.split(',').count() == columns));
    }

    #[test]
    fn json_round_trips_the_tally() {
        let report = sample_report();
        let summaries = summarize_report(&report);
        let text = render(|w| generate_json_report(w, &report, &summaries));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let tally = &value["report"]["exhaustion"];
        let total = tally["email"].as_u64().unwrap()
            + tally["attention"].as_u64().unwrap()
            + tally["goal"].as_u64().unwrap();
        assert_eq!(total, 6);
        assert_eq!(value["summaries"].as_array().unwrap().len(), summaries.len());
    }

    #[test]
    fn markdown_lists_every_metric() {
        let report = sample_report();
        let summaries = summarize_report(&report);
        let text = render(|w| generate_markdown_report(w, &report, &summaries));
        assert!(text.starts_with("# Flamewar Balance Report"));
        for summary in &summaries {
            assert!(text.contains(&format!("| {} |", summary.name)));
        }
    }

    #[test]
    fn console_includes_histograms() {
        let report = sample_report();
        let summaries = summarize_report(&report);
        let text = render(|w| {
            generate_console_report(w, &report, &summaries, 5, Duration::from_millis(3))
        });
        assert!(text.contains("Flamewar Balance Summary"));
        assert!(text.contains("Games ended by"));
        assert!(text.contains(" | "));
    }

    #[test]
    fn run_description_names_the_pile() {
        let report = sample_report();
        let run = &report.runs[0];
        assert!(describe_run(run).contains(run.exhaustion.key()));
    }
}
