/// 数据集采集与划分 (Dataset capture & split)
///
/// Two stages, run sequentially by one operator session:
/// - capture: frames → numbered files in a timestamped session directory
/// - split:   session files → disjoint train/val/test subsets
pub mod capture;
pub mod session;
pub mod split;

pub use capture::{run_capture, CaptureReport};
pub use session::{session_timestamp, Session};
pub use split::{split_session, SplitRatio, SplitSummary};
