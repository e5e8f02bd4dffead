pub mod json_output_adapter;
pub mod workbook_output_adapter;
