use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::model::FeatureImportance;
use crate::scoring::{head_to_head, to_display_percentage, HeadToHead, Outcome, ScoredRecord};

/// Bar width used when stdout is not a terminal
const DEFAULT_BAR_WIDTH: usize = 40;
/// Widest bar drawn even on very wide terminals
const MAX_BAR_WIDTH: usize = 60;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format an already-rounded percentage: 87.53 -> "87.53%"
pub fn format_percent(percentage: f64) -> String {
    format!("{:.2}%", percentage)
}

/// Points without a trailing ".0" for whole numbers: 437 -> "437", 12.5 -> "12.5"
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{:.0}", points)
    } else {
        format!("{}", points)
    }
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(filled)
}

fn bar_width(label_width: usize) -> usize {
    match get_terminal_width() {
        // label, two spaces, bar, space, "100.00%"
        Some(w) => w
            .saturating_sub(label_width + 2 + 1 + 7)
            .clamp(10, MAX_BAR_WIDTH),
        None => DEFAULT_BAR_WIDTH,
    }
}

/// Reminder that probabilities are per-row confidences
pub fn probability_note() -> &'static str {
    "Note: each probability is scored independently per driver and the column is not \
     normalized, so values need not sum to 100%. Separate uploads may each show a \
     confident champion."
}

/// Champion card: name, team, probability and season stats
pub fn format_champion(champion: &ScoredRecord, use_colors: bool) -> String {
    let r = &champion.record;
    let pct = format_percent(champion.win_percentage);
    if use_colors {
        format!(
            "{}\n  {}\n  {}\n  Championship probability: {}\n  Points: {}  Wins: {}  Podiums: {}",
            "PREDICTED CHAMPION".bold(),
            r.driver.red().bold(),
            r.team.cyan(),
            pct.bold(),
            format_points(r.points),
            r.wins,
            r.podiums
        )
    } else {
        format!(
            "PREDICTED CHAMPION\n  {}\n  {}\n  Championship probability: {}\n  Points: {}  Wins: {}  Podiums: {}",
            r.driver,
            r.team,
            pct,
            format_points(r.points),
            r.wins,
            r.podiums
        )
    }
}

/// Horizontal bar chart of the top `rows` drivers, bars scaled to 100%
pub fn format_probability_chart(ranked: &[&ScoredRecord], rows: usize, use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No drivers to chart.".to_string();
    }

    let shown = &ranked[..rows.min(ranked.len())];
    let label_width = shown
        .iter()
        .map(|s| s.driver().chars().count())
        .max()
        .unwrap_or(0)
        .min(20);
    let width = bar_width(label_width);

    shown
        .iter()
        .map(|s| {
            let label = format!(
                "{:<width$}",
                truncate_name(s.driver(), label_width),
                width = label_width
            );
            let bar = bar(s.win_probability, width);
            let pct = format_percent(s.win_percentage);
            if use_colors {
                format!("{}  {} {}", label, bar.red(), pct.dimmed())
            } else {
                format!("{}  {} {}", label, bar, pct)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard table: rank, driver, team, points, wins, podiums, probability
pub fn format_leaderboard(ranked: &[&ScoredRecord], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No drivers found.".to_string();
    }

    let driver_width = column_width(ranked.iter().map(|s| s.record.driver.as_str()), "DRIVER");
    let mut team_width = column_width(ranked.iter().map(|s| s.record.team.as_str()), "TEAM");

    // rank 4, driver, team, points 7, wins 5, podiums 8, win% 8, separators 12
    if let Some(term) = get_terminal_width() {
        let fixed = 4 + driver_width + 7 + 5 + 8 + 8 + 12;
        if term > fixed + 8 && fixed + team_width > term {
            team_width = term - fixed;
        }
    }

    let header = format!(
        "{:>3}  {:<dw$}  {:<tw$}  {:>7}  {:>5}  {:>8}  {:>8}",
        "#",
        "DRIVER",
        "TEAM",
        "POINTS",
        "WINS",
        "PODIUMS",
        "WIN %",
        dw = driver_width,
        tw = team_width
    );

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (idx, s) in ranked.iter().enumerate() {
        let r = &s.record;
        let index_str = format!("{:>2}.", idx + 1);
        let driver = format!("{:<width$}", r.driver, width = driver_width);
        let team = format!(
            "{:<width$}",
            truncate_name(&r.team, team_width),
            width = team_width
        );
        let stats = format!(
            "{:>7}  {:>5}  {:>8}",
            format_points(r.points),
            r.wins,
            r.podiums
        );
        let pct = format!("{:>8}", format_percent(s.win_percentage));

        lines.push(if use_colors {
            format!(
                "{}  {}  {}  {}  {}",
                index_str.dimmed(),
                driver.bold(),
                team.cyan(),
                stats,
                pct.bold()
            )
        } else {
            format!("{}  {}  {}  {}  {}", index_str, driver, team, stats, pct)
        });
    }

    lines.join("\n")
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Format leaderboard as tab-separated values for scripting
/// Columns: driver, team, points, wins, podiums, win_probability (no headers, no colors)
pub fn format_tsv(ranked: &[&ScoredRecord]) -> String {
    ranked
        .iter()
        .map(|s| {
            let r = &s.record;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                r.driver,
                r.team,
                format_points(r.points),
                r.wins,
                r.podiums,
                s.win_probability
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Head-to-head card with stat breakdown and verdict
pub fn format_comparison(a: &ScoredRecord, b: &ScoredRecord, use_colors: bool) -> String {
    let left_width = column_width(
        [a.driver(), a.record.team.as_str(), "TOTAL POINTS"].into_iter(),
        "",
    );
    let right_width = column_width([b.driver(), b.record.team.as_str()].into_iter(), "");

    let pct_a = format_percent(a.win_percentage);
    let pct_b = format_percent(b.win_percentage);

    let mut lines = Vec::new();
    let title = format!(
        "{:<lw$}   VS   {}",
        a.driver(),
        b.driver(),
        lw = left_width
    );
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });
    lines.push(format!(
        "{:<lw$}        {}",
        a.record.team,
        b.record.team,
        lw = left_width
    ));
    lines.push(format!(
        "{:<lw$}        {}",
        pct_a,
        pct_b,
        lw = left_width
    ));
    lines.push(String::new());

    let metric_width = 12;
    let value_width = left_width.max(right_width).max(8);
    lines.push(format!(
        "{:<mw$}  {:>vw$}  {:>vw$}",
        "METRIC",
        truncate_name(a.driver(), value_width),
        truncate_name(b.driver(), value_width),
        mw = metric_width,
        vw = value_width
    ));
    let rows = [
        ("TOTAL POINTS", format_points(a.record.points), format_points(b.record.points)),
        ("RACE WINS", a.record.wins.to_string(), b.record.wins.to_string()),
        ("PODIUMS", a.record.podiums.to_string(), b.record.podiums.to_string()),
    ];
    for (metric, va, vb) in rows {
        lines.push(format!(
            "{:<mw$}  {:>vw$}  {:>vw$}",
            metric,
            va,
            vb,
            mw = metric_width,
            vw = value_width
        ));
    }
    lines.push(String::new());

    let verdict = match head_to_head(a, b) {
        HeadToHead::First => format!("{} has the higher championship probability.", a.driver()),
        HeadToHead::Second => format!("{} has the higher championship probability.", b.driver()),
        HeadToHead::DeadHeat => {
            "Dead heat: both drivers have identical championship probabilities.".to_string()
        }
    };
    lines.push(if use_colors {
        format!("{} {}", "VERDICT:".bold(), verdict.green())
    } else {
        format!("VERDICT: {}", verdict)
    });

    lines.join("\n")
}

/// Simulator result: inputs, probability, and outcome band
pub fn format_simulation(
    points: f64,
    wins: u32,
    podiums: u32,
    probability: f64,
    use_colors: bool,
) -> String {
    let outcome = Outcome::from_probability(probability);
    let pct = format_percent(to_display_percentage(probability));
    let inputs = format!(
        "Points: {}  Wins: {}  Podiums: {}",
        format_points(points),
        wins,
        podiums
    );

    if use_colors {
        let headline = match outcome {
            Outcome::DominantChampion => outcome.headline().green().bold().to_string(),
            Outcome::StrongContender => outcome.headline().yellow().bold().to_string(),
            Outcome::Midfield => outcome.headline().cyan().bold().to_string(),
            Outcome::NoChance => outcome.headline().red().bold().to_string(),
        };
        format!(
            "{}\n  Win probability: {}\n  {} {}",
            inputs,
            pct.bold(),
            headline,
            outcome.description()
        )
    } else {
        format!(
            "{}\n  Win probability: {}\n  {} {}",
            inputs,
            pct,
            outcome.headline(),
            outcome.description()
        )
    }
}

/// Feature importance chart, expects entries sorted most important first
pub fn format_insights(importances: &[FeatureImportance], use_colors: bool) -> String {
    if importances.is_empty() {
        return "Feature importance unavailable for this model.".to_string();
    }

    let label_width = importances
        .iter()
        .map(|i| i.feature.len())
        .max()
        .unwrap_or(0);
    let width = bar_width(label_width);

    let mut lines: Vec<String> = importances
        .iter()
        .map(|i| {
            let label = format!("{:<width$}", i.feature.to_uppercase(), width = label_width);
            let bar = bar(i.importance, width);
            let pct = format_percent(to_display_percentage(i.importance));
            if use_colors {
                format!("{}  {} {}", label, bar.red(), pct.dimmed())
            } else {
                format!("{}  {} {}", label, bar, pct)
            }
        })
        .collect();

    lines.push(String::new());
    let top = importances[0].feature.to_uppercase();
    lines.push(if use_colors {
        format!("{} is the #1 predictor.", top.bold())
    } else {
        format!("{} is the #1 predictor.", top)
    });

    lines.join("\n")
}
