//! Built-in sample report.
//!
//! Each step's excerpt is cut from this file's own source, so the report
//! shows the exact code that produced each section.

use dash_markup::{DataTable, SvgArtifact};
use dash_report::{Args, BoundArgs, Dashboard, ReportStep, Signature, StepResult};
use serde_json::json;
use std::fmt::Write as _;
use thiserror::Error;

const SOURCE: &str = include_str!("demo.rs");

/// Invocations recorded when `run` is given none.
pub const DEFAULT_SCRIPT: &[&str] = &[
    "stats [3,1,4,1,5,9,2,6]",
    "histogram [3,1,4,1,5,9,2,6] bins=3",
    "inventory",
    "divide 1 0",
    "divide 7 2",
    "overview [2,7,1,8,2,8]",
    r#"notes "first line\nsecond line""#,
];

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("no numbers to summarize")]
    Empty,

    #[error("cannot divide {0} by zero")]
    DivisionByZero(f64),

    #[error("bin count {0} outside 1..=50")]
    Bins(i64),
}

/// Count, centre and spread of a list of numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl Summary {
    pub fn of(numbers: &[f64]) -> Result<Self, DemoError> {
        if numbers.is_empty() {
            return Err(DemoError::Empty);
        }
        let mut sorted = numbers.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Ok(Self {
            count,
            mean,
            median,
            min: sorted[0],
            max: sorted[count - 1],
            std_dev: variance.sqrt(),
        })
    }

    pub fn table(&self, precision: usize) -> DataTable {
        let metrics = [
            ("mean", self.mean),
            ("median", self.median),
            ("min", self.min),
            ("max", self.max),
            ("std dev", self.std_dev),
        ];
        metrics
            .iter()
            .fold(DataTable::new(["metric", "value"]), |table, (name, value)| {
                table.with_row(vec![json!(name), json!(format!("{value:.precision$}"))])
            })
    }
}

/// Bucket counts over `[min, max]`, `bins` equal-width buckets.
pub fn bucket_counts(numbers: &[f64], bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    let (Some(min), Some(max)) = (
        numbers.iter().copied().reduce(f64::min),
        numbers.iter().copied().reduce(f64::max),
    ) else {
        return counts;
    };
    let span = max - min;
    for value in numbers {
        let slot = if span == 0.0 {
            0
        } else {
            (((value - min) / span) * bins as f64) as usize
        };
        counts[slot.min(bins - 1)] += 1;
    }
    counts
}

/// Bar chart of `counts` as standalone SVG markup.
pub fn bar_chart(counts: &[usize]) -> String {
    const WIDTH: f64 = 240.0;
    const HEIGHT: f64 = 120.0;
    let tallest = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let slot = WIDTH / counts.len().max(1) as f64;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    for (i, count) in counts.iter().enumerate() {
        let height = *count as f64 / tallest * (HEIGHT - 10.0);
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="steelblue"/>"#,
            i as f64 * slot + 2.0,
            HEIGHT - height,
            slot - 4.0,
            height
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn stats(d: &mut Dashboard, args: &BoundArgs) -> StepResult {
    let numbers: Vec<f64> = args.get_as("numbers")?;
    let precision = args.get_i64("precision")?.clamp(0, 10) as usize;
    let summary = Summary::of(&numbers)?;
    writeln!(d, "{} values", summary.count)?;
    d.output(&summary.table(precision))?;
    Ok(())
}

fn histogram(d: &mut Dashboard, args: &BoundArgs) -> StepResult {
    let numbers: Vec<f64> = args.get_as("numbers")?;
    let bins = args.get_i64("bins")?;
    if !(1..=50).contains(&bins) {
        return Err(DemoError::Bins(bins).into());
    }
    let counts = bucket_counts(&numbers, bins as usize);
    writeln!(d, "bucket counts: {counts:?}")?;
    d.open_figure(SvgArtifact::new(bar_chart(&counts)));
    Ok(())
}

fn divide(d: &mut Dashboard, args: &BoundArgs) -> StepResult {
    let (a, b) = (args.get_f64("a")?, args.get_f64("b")?);
    if b == 0.0 {
        return Err(DemoError::DivisionByZero(a).into());
    }
    d.output(&format!("{a} / {b} = {}", a / b))?;
    Ok(())
}

fn overview(d: &mut Dashboard, args: &BoundArgs) -> StepResult {
    let numbers = args.require("numbers")?.clone();
    writeln!(d, "overview of {numbers}")?;
    d.call("stats", &Args::new().arg(numbers.clone()).kwarg("precision", 1))?;
    d.call("histogram", &Args::new().arg(numbers).kwarg("bins", 4))?;
    Ok(())
}

#[derive(Debug)]
#[allow(dead_code)]
struct Shelf {
    aisle: u8,
    items: Vec<(&'static str, u32)>,
}

fn inventory(d: &mut Dashboard, _args: &BoundArgs) -> StepResult {
    let shelf = Shelf {
        aisle: 4,
        items: vec![("apples", 12), ("pears", 0), ("plums", 31)],
    };
    let table = shelf
        .items
        .iter()
        .fold(DataTable::new(["item", "stock"]), |table, (item, stock)| {
            table.with_row(vec![json!(item), json!(stock)])
        });
    d.output(&table)?;
    d.output(&shelf)?;
    Ok(())
}

fn notes(d: &mut Dashboard, args: &BoundArgs) -> StepResult {
    d.print(args.get_str("text")?);
    Ok(())
}

type Handler = fn(&mut Dashboard, &BoundArgs) -> StepResult;

/// Source text of the function `name` in `source`, header to closing brace.
pub fn definition_of<'a>(source: &'a str, name: &str) -> Option<&'a str> {
    let header = format!("fn {name}(");
    let mut start: Option<(usize, usize)> = None;
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        match start {
            None if trimmed.starts_with(&header) => start = Some((offset, indent)),
            Some((begin, depth)) if indent == depth && trimmed.trim_end() == "}" => {
                return Some(&source[begin..offset + line.len()]);
            }
            _ => {}
        }
        offset += line.len();
    }
    None
}

fn step(signature: Signature, handler: Handler, description: &str) -> ReportStep {
    let definition = definition_of(SOURCE, signature.name()).unwrap_or_default();
    ReportStep::new(signature, handler)
        .with_source(definition)
        .with_description(description)
}

/// Register every sample step on `dash`.
pub fn register_all(dash: &mut Dashboard) -> dash_report::Result<()> {
    let steps = [
        step(
            Signature::new("stats").param("numbers").optional("precision", 2),
            stats,
            "summary statistics as a table",
        ),
        step(
            Signature::new("histogram").param("numbers").optional("bins", 5),
            histogram,
            "bucket counts drawn as an SVG bar chart",
        ),
        step(
            Signature::new("divide").param("a").param("b"),
            divide,
            "a / b; fails on a zero divisor",
        ),
        step(
            Signature::new("overview").param("numbers"),
            overview,
            "stats and histogram in one section",
        ),
        step(Signature::new("inventory"), inventory, "a table and a raw value dump"),
        step(Signature::new("notes").param("text"), notes, "free text"),
    ];
    for s in steps {
        dash.register(s)?;
    }
    Ok(())
}
