use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::{
    services::{activation::ActivationMilestoneNotifier, scheduler::MessageScheduler},
    usecases::run_sweep::RunSweepUseCase,
};

#[derive(Clone)]
pub struct ApiState {
    pub scheduler: Arc<MessageScheduler>,
    pub sweep_usecase: Arc<RunSweepUseCase>,
    pub milestone_notifier: Arc<ActivationMilestoneNotifier>,
    pub batch_service_key: String,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Schedules,
    Users,
    Batch,
}
