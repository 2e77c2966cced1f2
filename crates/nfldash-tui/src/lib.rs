// Terminal dashboard for nfldash season summaries.

pub mod tui;
