pub mod analyze_use_case;
pub mod ports;
