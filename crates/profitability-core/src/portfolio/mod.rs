pub mod summary;

pub use summary::{summarize, CoverageTotal, PortfolioSummary, ShortfallSignal, SummaryLine};
