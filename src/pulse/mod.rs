// src/pulse/mod.rs
// 脉冲模型与脉冲序列
pub mod model;
pub mod train;
pub use model::PulseModel;
pub use train::PulseTrain;
