/// Task name constants shared by the CLI, the config file and output names.

// Task names (used in CLI and output file names)
pub const VISUAL_SEARCH_TASK: &str = "visual_search";
pub const STROOP_TASK: &str = "stroop";

/// Default workbook names per task
pub const VISUAL_SEARCH_WORKBOOK: &str = "visual_search_batch_results.xlsx";
pub const STROOP_WORKBOOK: &str = "stroop_analysis_output.xlsx";

/// Instrument header rows preceding the column header row
pub const DEFAULT_PREAMBLE_ROWS: usize = 3;

/// Extensions the table reader understands
pub const CSV_EXTENSION: &str = ".csv";
pub const XLSX_EXTENSION: &str = ".xlsx";
pub const SUPPORTED_EXTENSIONS: [&str; 2] = [CSV_EXTENSION, XLSX_EXTENSION];

// Workbook sheet names
pub const SUMMARY_SHEET: &str = "Summary";
pub const RAW_SHEET: &str = "Combined Raw";

// Metadata and derived column names
pub const PARTICIPANT_COLUMN: &str = "Participant";
pub const CONDITION_COLUMN: &str = "Condition";
pub const TIME_COLUMN: &str = "Time";
pub const GROUP_COLUMN: &str = "Group";
pub const SET_SIZE_COLUMN: &str = "SetSize";
pub const CONDITION_LABEL_COLUMN: &str = "ConditionLabel";
pub const PRESENCE_LABEL_COLUMN: &str = "PresenceLabel";
pub const STIM_CONDITION_LABEL_COLUMN: &str = "StimConditionLabel";

// Statistics columns, in the order they are appended
pub const TOTAL_TRIALS_COLUMN: &str = "Total Trials";
pub const MEAN_RT_COLUMN: &str = "Mean RT";
pub const SD_RT_COLUMN: &str = "SD RT";
pub const ACCURATE_COLUMN: &str = "Accurate Responses";
pub const PERCENT_ACCURACY_COLUMN: &str = "Percent Accuracy";
pub const STAT_COLUMNS: [&str; 4] = [
    MEAN_RT_COLUMN,
    SD_RT_COLUMN,
    ACCURATE_COLUMN,
    PERCENT_ACCURACY_COLUMN,
];

/// Get all supported task names
pub fn get_supported_tasks() -> Vec<&'static str> {
    vec![VISUAL_SEARCH_TASK, STROOP_TASK]
}

pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}
