// Handler modules
pub mod show;

pub use show::{ShowReport, ShowSettings, TreeView, handle_show, render_all};
