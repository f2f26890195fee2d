//! Table detection settings.

/// Source of the edges used to find table grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStrategy {
    /// Ruling lines and rectangle borders drawn on the page.
    #[default]
    Lines,
    /// Ruling lines only; filled rectangles are ignored.
    LinesStrict,
}

/// Parameters for ruled-table detection.
///
/// Defaults match the settings tuned for financial statements: lines on both
/// axes and a tolerance of 3 points everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Edge source for vertical boundaries.
    pub vertical_strategy: TableStrategy,
    /// Edge source for horizontal boundaries.
    pub horizontal_strategy: TableStrategy,
    /// Parallel edges closer than this are aligned to their mean position.
    pub snap_tolerance: f32,
    /// Collinear segments with a gap up to this are merged.
    pub join_tolerance: f32,
    /// Edges shorter than this (after joining) are discarded.
    pub edge_min_length: f32,
    /// Slack when testing whether a horizontal and a vertical edge cross.
    pub intersection_tolerance: f32,
}

impl TableSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both strategies.
    pub fn with_strategy(mut self, strategy: TableStrategy) -> Self {
        self.vertical_strategy = strategy;
        self.horizontal_strategy = strategy;
        self
    }

    /// Set the snap tolerance.
    pub fn with_snap_tolerance(mut self, tolerance: f32) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Set the join tolerance.
    pub fn with_join_tolerance(mut self, tolerance: f32) -> Self {
        self.join_tolerance = tolerance;
        self
    }

    /// Set the minimum edge length.
    pub fn with_edge_min_length(mut self, length: f32) -> Self {
        self.edge_min_length = length;
        self
    }

    /// Set the intersection tolerance.
    pub fn with_intersection_tolerance(mut self, tolerance: f32) -> Self {
        self.intersection_tolerance = tolerance;
        self
    }
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: TableStrategy::Lines,
            horizontal_strategy: TableStrategy::Lines,
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            edge_min_length: 3.0,
            intersection_tolerance: 3.0,
        }
    }
}
