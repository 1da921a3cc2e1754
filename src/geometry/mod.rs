//! 几何层
//!
//! 坐标文件 → 坐标记录 → 页面相对框 → 合并后的框集合

pub mod accumulator;
pub mod box_engine;
pub mod position_parser;

pub use accumulator::{accumulate, AccumulatedBoxSet, PartBox};
pub use box_engine::{compute_box, round_to, RIGHT_EDGE_MIN_PERCENT, SP_PER_PT};
pub use position_parser::{load_positions, parse_line, parse_positions};
