pub mod upload_flow;
pub mod upload_state;

pub use upload_flow::{GradingPlatform, UploadOrchestrator};
pub use upload_state::{
    next_step, transition, ReplacePolicy, Resolution, StepOutcome, UploadState, UploadStep,
};
