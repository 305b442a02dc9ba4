//! 本地 SVG 图表渲染

use askama::Template;
use std::f64::consts::PI;

use crate::errors::AssetResolutionError;
use crate::types::block::{ChartData, ChartKind, SvgElement, SvgStyle};
use crate::types::tokens::DesignTokens;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 40.0;

fn style_for(tokens: &DesignTokens) -> SvgStyle {
    SvgStyle {
        fill: tokens.colors.primary.clone(),
        stroke: tokens.colors.accent.clone(),
        font_family: tokens.fonts.body.clone(),
    }
}

fn fmt_value(value: f64, unit: Option<&str>) -> String {
    let number = if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    };
    match unit {
        Some("%") => format!("{}%", number),
        Some(unit) if unit.starts_with(['$', '€', '£']) => {
            let (currency, scale) = unit.split_at(unit.chars().next().map_or(0, char::len_utf8));
            format!("{}{}{}", currency, number, scale_suffix(scale))
        }
        Some(unit) => format!("{}{}", number, scale_suffix(unit)),
        None => number,
    }
}

fn scale_suffix(scale: &str) -> &str {
    match scale {
        "billion" | "bn" | "b" => "B",
        "million" | "m" => "M",
        "thousand" | "k" => "K",
        other => other,
    }
}

fn px(value: f64) -> String {
    format!("{:.1}", value)
}

struct Bar {
    x: String,
    y: String,
    width: String,
    height: String,
    fill: String,
}

struct Label {
    x: String,
    y: String,
    small: bool,
    text: String,
}

/// 图表中的单个图元
enum Mark {
    Bar(Bar),
    Label(Label),
    /// 折线顶点与描边颜色
    Line(String, String),
    Dot(String, String, String),
    Wedge(String, String),
}

#[derive(Template)]
#[template(path = "chart.svg", escape = "html")]
struct ChartTemplate<'a> {
    width: f64,
    height: f64,
    font_family: &'a str,
    caption: &'a str,
    marks: Vec<Mark>,
}

fn bar_marks(data: &ChartData, style: &SvgStyle) -> Vec<Mark> {
    let max = data.values.iter().cloned().fold(0.0_f64, f64::max).max(f64::EPSILON);
    let slot = (WIDTH - 2.0 * PADDING) / data.values.len() as f64;
    let bar_width = slot * 0.6;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let mut marks = Vec::with_capacity(data.values.len() * 3);
    for (index, (value, label)) in data.values.iter().zip(&data.labels).enumerate() {
        let height = (value.max(0.0) / max) * plot_height;
        let x = PADDING + slot * index as f64 + (slot - bar_width) / 2.0;
        let y = HEIGHT - PADDING - height;
        marks.push(Mark::Bar(Bar {
            x: px(x),
            y: px(y),
            width: px(bar_width),
            height: px(height),
            fill: style.fill.clone(),
        }));
        marks.push(Mark::Label(Label {
            x: px(x + bar_width / 2.0),
            y: px(y - 6.0),
            small: false,
            text: fmt_value(*value, data.unit.as_deref()),
        }));
        marks.push(Mark::Label(Label {
            x: px(x + bar_width / 2.0),
            y: px(HEIGHT - PADDING / 2.0),
            small: true,
            text: label.clone(),
        }));
    }
    marks
}

fn line_marks(data: &ChartData, style: &SvgStyle) -> Vec<Mark> {
    let max = data.values.iter().cloned().fold(0.0_f64, f64::max).max(f64::EPSILON);
    let steps = (data.values.len().max(2) - 1) as f64;
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let points: Vec<(f64, f64)> = data
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            (
                PADDING + plot_width * index as f64 / steps,
                HEIGHT - PADDING - (value.max(0.0) / max) * plot_height,
            )
        })
        .collect();

    let path = points
        .iter()
        .map(|(x, y)| format!("{},{}", px(*x), px(*y)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut marks = vec![Mark::Line(path, style.stroke.clone())];
    for ((x, y), (value, label)) in points.iter().zip(data.values.iter().zip(&data.labels)) {
        marks.push(Mark::Dot(px(*x), px(*y), style.fill.clone()));
        marks.push(Mark::Label(Label {
            x: px(*x),
            y: px(y - 10.0),
            small: false,
            text: format!("{} ({})", label, fmt_value(*value, data.unit.as_deref())),
        }));
    }
    marks
}

fn pie_marks(data: &ChartData, style: &SvgStyle) -> Vec<Mark> {
    let total: f64 = data.values.iter().map(|v| v.max(0.0)).sum::<f64>().max(f64::EPSILON);
    let (cx, cy, r) = (WIDTH / 2.0, HEIGHT / 2.0, HEIGHT / 2.0 - PADDING);
    let mut angle = -PI / 2.0;

    let mut marks = Vec::with_capacity(data.values.len());
    for (index, value) in data.values.iter().enumerate() {
        let sweep = value.max(0.0) / total * 2.0 * PI;
        let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
        let end = angle + sweep;
        let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
        let large_arc = if sweep > PI { 1 } else { 0 };
        let fill = if index % 2 == 0 { &style.fill } else { &style.stroke };
        let path = format!(
            "M{},{} L{},{} A{},{} 0 {} 1 {},{} Z",
            px(cx),
            px(cy),
            px(x1),
            px(y1),
            px(r),
            px(r),
            large_arc,
            px(x2),
            px(y2)
        );
        marks.push(Mark::Wedge(path, fill.clone()));
        angle = end;
    }
    marks
}

/// 将图表数据渲染为内联 SVG
pub fn render_chart(data: &ChartData, tokens: &DesignTokens) -> Result<SvgElement, AssetResolutionError> {
    if data.values.is_empty() || data.values.len() != data.labels.len() {
        return Err(AssetResolutionError::Unsupported(format!(
            "chart \"{}\" has {} values and {} labels",
            data.caption,
            data.values.len(),
            data.labels.len()
        )));
    }
    if data.values.iter().any(|v| !v.is_finite()) {
        return Err(AssetResolutionError::Unsupported(format!(
            "chart \"{}\" contains non-finite values",
            data.caption
        )));
    }

    let style = style_for(tokens);
    let marks = match data.chart_type {
        ChartKind::Bar => bar_marks(data, &style),
        ChartKind::Line => line_marks(data, &style),
        ChartKind::Pie => pie_marks(data, &style),
    };
    let markup = ChartTemplate {
        width: WIDTH,
        height: HEIGHT,
        font_family: &style.font_family,
        caption: &data.caption,
        marks,
    }
    .render()
    .map_err(|e| AssetResolutionError::Render(e.to_string()))?;

    Ok(SvgElement {
        svg_type: data.chart_type,
        data: data.clone(),
        style,
        markup,
    })
}
