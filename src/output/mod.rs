mod csv;
mod format;
mod json;
mod table;

pub(crate) use csv::render_view_csv;
pub(crate) use format::NumberFormat;
pub(crate) use json::render_view_json;
pub(crate) use table::{
    SummaryOptions, TableOptions, print_file_list, print_summary_line, render_view_table,
};
