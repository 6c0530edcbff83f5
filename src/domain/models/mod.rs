pub mod message;
pub mod schedule;

pub use message::MessageKind;
pub use schedule::{
    DEFAULT_REMINDER, NewScheduledMessage, ScheduledMessage, SchedulingStats, SweepReport,
};
