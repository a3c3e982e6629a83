//! The selected-planet panel.

use exo_catalog::PlanetRecord;
use rand::Rng;

use crate::fields::panel_fields;
use crate::text_cycle::TextCycle;

pub const PANEL_TITLE: &str = "Exoplanet Data";

/// Seconds for each text reveal.
const REVEAL_DURATION: f32 = 1.0;
/// Extra fade-in delay per row.
const ROW_STAGGER: f32 = 0.03;
const ROW_FADE: f32 = 0.3;
/// Rows slide up this many pixels while fading in.
const ROW_SLIDE: f32 = 5.0;
const PANEL_FADE: f32 = 0.5;
const PANEL_SLIDE: f32 = 20.0;

struct PanelRow {
    label: TextCycle,
    value: TextCycle,
    delay: f32,
}

/// A row as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub label: String,
    pub value: String,
    pub opacity: f32,
    /// Downward offset in pixels, shrinking to zero as the row appears.
    pub offset_y: f32,
}

/// Animated panel content for one selected record.
///
/// Build a fresh panel whenever the selection changes.
pub struct DetailPanel {
    title: TextCycle,
    rows: Vec<PanelRow>,
    elapsed: f32,
}

impl DetailPanel {
    pub fn new<R: Rng + ?Sized>(record: &PlanetRecord, rng: &mut R) -> Self {
        let rows = panel_fields(record)
            .into_iter()
            .enumerate()
            .map(|(index, field)| PanelRow {
                label: TextCycle::new(field.label, REVEAL_DURATION, rng),
                value: TextCycle::new(&field.value, REVEAL_DURATION, rng),
                delay: index as f32 * ROW_STAGGER,
            })
            .collect();
        Self {
            title: TextCycle::new(PANEL_TITLE, REVEAL_DURATION, rng),
            rows,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        self.title.advance(dt);
        for row in &mut self.rows {
            row.label.advance(dt);
            row.value.advance(dt);
        }
    }

    pub fn title(&self) -> String {
        self.title.text()
    }

    /// Panel opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        (self.elapsed / PANEL_FADE).clamp(0.0, 1.0)
    }

    /// Upward offset in pixels while the panel drops into place.
    pub fn offset_y(&self) -> f32 {
        -PANEL_SLIDE * (1.0 - self.opacity())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView> + '_ {
        self.rows.iter().map(|row| {
            let opacity = ((self.elapsed - row.delay) / ROW_FADE).clamp(0.0, 1.0);
            RowView {
                label: row.label.text(),
                value: row.value.text(),
                opacity,
                offset_y: ROW_SLIDE * (1.0 - opacity),
            }
        })
    }

    /// True once every text has resolved and every row is fully visible.
    pub fn is_settled(&self) -> bool {
        self.title.is_complete()
            && self.opacity() >= 1.0
            && self.rows().all(|row| row.opacity >= 1.0)
            && self
                .rows
                .iter()
                .all(|row| row.label.is_complete() && row.value.is_complete())
    }
}
