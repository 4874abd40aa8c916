//! Chart types.
//!
//! Each chart owns the shared [`Config`] (fluent accessors, margins,
//! domains, toggles) and implements its own layout algorithm; the shared
//! render lifecycle and event queue come from the base module.

pub(crate) mod base;

mod area;
mod bar;
mod discrete_bar;
mod heatmap;
mod line;
mod pie;
mod scatter;
mod table;

pub use area::AreaChart;
pub use bar::BarChart;
pub use base::{Config, Dispatch, Domain, Event, Interpolate, Margin, Threshold, TooltipFn};
pub use discrete_bar::DiscreteBarChart;
pub use heatmap::HeatmapChart;
pub use line::LineChart;
pub use pie::PieChart;
pub use scatter::ScatterChart;
pub use table::{CellFormatter, Column, Row, SortDirection, TableChart};
