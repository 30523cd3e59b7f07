pub mod camera; // 相机输入系统
pub mod config; // 采集配置参数
pub mod control; // 操作员停止信号
pub mod dataset; // 数据集采集与划分
pub mod detection; // 检测能力接口
pub mod display; // 显示输出

pub use crate::camera::{
    CameraSettings, DepthMap, FrameSource, Grab, ReplayCamera, Resolution, StereoFrame,
    StereoSource,
};
pub use crate::config::CollectorConfig;
pub use crate::control::{stop_channel, StopSignal, StopTrigger};
pub use crate::dataset::{
    run_capture, session_timestamp, split_session, CaptureReport, Session, SplitRatio,
    SplitSummary,
};
pub use crate::detection::{Bbox, Detection, Inference, Overlay, ReplayDetector};
pub use crate::display::{FrameSink, NullSink, PreviewSink};
