pub mod ports;
pub mod analyze_use_case;
