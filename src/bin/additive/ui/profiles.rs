//! Profile editor widgets - one bar chart per profile plus the morph gauge

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge},
    Frame,
};

use additive_midi::harmonic::HarmonicProfile;

/// Bars are drawn in percent
const BAR_SCALE: f32 = 100.0;

/// Render a profile as eight bars labelled by harmonic number (2..9)
pub fn render_profile(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    profile: &HarmonicProfile,
    selected: Option<usize>,
) {
    let focused = selected.is_some();
    let border = if focused { Color::Cyan } else { Color::DarkGray };

    let bars: Vec<Bar> = profile
        .strengths()
        .iter()
        .enumerate()
        .map(|(i, &strength)| {
            let color = if selected == Some(i) {
                Color::Yellow
            } else {
                Color::Green
            };
            Bar::default()
                .value((strength * BAR_SCALE).round() as u64)
                .label(format!("{}", i + 2).into())
                .text_value(format!("{:.2}", strength))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .max(BAR_SCALE as u64);

    frame.render_widget(chart, area);
}

/// Render the morph amount between the two profiles
pub fn render_morph(frame: &mut Frame, area: Rect, morph: f32, focused: bool) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Morph  harm1 ◀ ▶ harm2 ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .gauge_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .ratio(f64::from(morph.clamp(0.0, 1.0)))
        .label(format!("{:.2}", morph));

    frame.render_widget(gauge, area);
}
